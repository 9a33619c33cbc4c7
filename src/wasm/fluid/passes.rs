//! Per-frame pipeline stages. Each function takes the rendering context
//! explicitly and reads one half of a double buffer while writing the
//! other; the caller swaps afterwards (done here, right after each write).

use wasm_bindgen::JsValue;
use web_sys::{WebGl2RenderingContext as GL, WebGlTexture};

use crate::color::Rgb;
use crate::config::FluidConfig;
use crate::layout::{sim_resolution, UvRect};

use super::gl::{DoubleFbo, Fbo, Gl, TexFormat};
use super::program::{Material, Program};
use super::shaders;

/// All compiled stages.
pub struct Pipeline {
    pub copy: Program,
    pub clear: Program,
    pub splat: Program,
    pub advection: Program,
    pub divergence: Program,
    pub curl: Program,
    pub vorticity: Program,
    pub pressure: Program,
    pub gradient_subtract: Program,
    pub display: Material,
}

impl Pipeline {
    pub fn new(gl: &Gl, cfg: &FluidConfig) -> Result<Pipeline, JsValue> {
        let vertex = gl.compile_shader(GL::VERTEX_SHADER, shaders::BASE_VERTEX, None)?;
        let advection_keywords: Option<&[&str]> = if gl.linear_filtering {
            None
        } else {
            Some(&["MANUAL_FILTERING"])
        };

        let mut display = Material::new(vertex.clone(), shaders::DISPLAY_FRAGMENT);
        let display_keywords: &[&str] = if cfg.shading { &["SHADING"] } else { &[] };
        display.set_keywords(gl, display_keywords)?;

        Ok(Pipeline {
            copy: Program::new(gl, &vertex, shaders::COPY_FRAGMENT, None)?,
            clear: Program::new(gl, &vertex, shaders::CLEAR_FRAGMENT, None)?,
            splat: Program::new(gl, &vertex, shaders::SPLAT_FRAGMENT, None)?,
            advection: Program::new(gl, &vertex, shaders::ADVECTION_FRAGMENT, advection_keywords)?,
            divergence: Program::new(gl, &vertex, shaders::DIVERGENCE_FRAGMENT, None)?,
            curl: Program::new(gl, &vertex, shaders::CURL_FRAGMENT, None)?,
            vorticity: Program::new(gl, &vertex, shaders::VORTICITY_FRAGMENT, None)?,
            pressure: Program::new(gl, &vertex, shaders::PRESSURE_FRAGMENT, None)?,
            gradient_subtract: Program::new(gl, &vertex, shaders::GRADIENT_SUBTRACT_FRAGMENT, None)?,
            display,
        })
    }
}

/// Simulation render targets. Velocity and dye are double-buffered; curl
/// and divergence are written fresh each frame; pressure double-buffers
/// across Jacobi sweeps and carries damped values between frames.
pub struct SimBuffers {
    pub dye: DoubleFbo,
    pub velocity: DoubleFbo,
    pub divergence: Fbo,
    pub curl: Fbo,
    pub pressure: DoubleFbo,
}

/// Create the full buffer set, or resize an existing one. Double buffers
/// carry their current read contents forward through the copy stage so the
/// simulation survives a resize visually intact.
pub fn init_buffers(
    gl: &Gl,
    copy: &Program,
    cfg: &FluidConfig,
    existing: Option<SimBuffers>,
    drawing_w: u32,
    drawing_h: u32,
) -> Result<SimBuffers, JsValue> {
    let (sim_w, sim_h) = sim_resolution(cfg.sim_resolution, drawing_w, drawing_h);
    let (dye_w, dye_h) = sim_resolution(cfg.dye_resolution, drawing_w, drawing_h);
    let (sim_w, sim_h) = (sim_w as i32, sim_h as i32);
    let (dye_w, dye_h) = (dye_w as i32, dye_h as i32);

    gl.ctx().disable(GL::BLEND);
    let filter = gl.sim_filter();

    match existing {
        Some(mut bufs) => {
            resize_double(gl, copy, &mut bufs.dye, dye_w, dye_h, gl.format_rgba, filter)?;
            resize_double(gl, copy, &mut bufs.velocity, sim_w, sim_h, gl.format_rg, filter)?;
            bufs.divergence = gl.create_fbo(sim_w, sim_h, gl.format_r, GL::NEAREST)?;
            bufs.curl = gl.create_fbo(sim_w, sim_h, gl.format_r, GL::NEAREST)?;
            bufs.pressure = gl.create_double_fbo(sim_w, sim_h, gl.format_r, GL::NEAREST)?;
            Ok(bufs)
        }
        None => Ok(SimBuffers {
            dye: gl.create_double_fbo(dye_w, dye_h, gl.format_rgba, filter)?,
            velocity: gl.create_double_fbo(sim_w, sim_h, gl.format_rg, filter)?,
            divergence: gl.create_fbo(sim_w, sim_h, gl.format_r, GL::NEAREST)?,
            curl: gl.create_fbo(sim_w, sim_h, gl.format_r, GL::NEAREST)?,
            pressure: gl.create_double_fbo(sim_w, sim_h, gl.format_r, GL::NEAREST)?,
        }),
    }
}

fn resize_double(
    gl: &Gl,
    copy: &Program,
    target: &mut DoubleFbo,
    width: i32,
    height: i32,
    format: TexFormat,
    filter: u32,
) -> Result<(), JsValue> {
    if target.width == width && target.height == height {
        return Ok(());
    }
    let read = gl.create_fbo(width, height, format, filter)?;
    copy.bind(gl);
    gl.ctx()
        .uniform1i(copy.uniform("uTexture"), target.read().attach(gl, 0));
    gl.blit(Some(&read), false);
    let write = gl.create_fbo(width, height, format, filter)?;
    target.replace(read, write);
    Ok(())
}

/// One simulation step, in strict stage order.
pub fn step(gl: &Gl, pipe: &Pipeline, bufs: &mut SimBuffers, cfg: &FluidConfig, dt: f32) {
    let ctx = gl.ctx();
    ctx.disable(GL::BLEND);

    // curl of the velocity field
    pipe.curl.bind(gl);
    ctx.uniform2f(
        pipe.curl.uniform("texelSize"),
        bufs.velocity.texel_x,
        bufs.velocity.texel_y,
    );
    ctx.uniform1i(pipe.curl.uniform("uVelocity"), bufs.velocity.read().attach(gl, 0));
    gl.blit(Some(&bufs.curl), false);

    // vorticity confinement force
    pipe.vorticity.bind(gl);
    ctx.uniform2f(
        pipe.vorticity.uniform("texelSize"),
        bufs.velocity.texel_x,
        bufs.velocity.texel_y,
    );
    ctx.uniform1i(
        pipe.vorticity.uniform("uVelocity"),
        bufs.velocity.read().attach(gl, 0),
    );
    ctx.uniform1i(pipe.vorticity.uniform("uCurl"), bufs.curl.attach(gl, 1));
    ctx.uniform1f(pipe.vorticity.uniform("curl"), cfg.curl);
    ctx.uniform1f(pipe.vorticity.uniform("dt"), dt);
    gl.blit(Some(bufs.velocity.write()), false);
    bufs.velocity.swap();

    // divergence of the post-confinement velocity
    pipe.divergence.bind(gl);
    ctx.uniform2f(
        pipe.divergence.uniform("texelSize"),
        bufs.velocity.texel_x,
        bufs.velocity.texel_y,
    );
    ctx.uniform1i(
        pipe.divergence.uniform("uVelocity"),
        bufs.velocity.read().attach(gl, 0),
    );
    gl.blit(Some(&bufs.divergence), false);

    // damp stale pressure instead of clearing it; the carry-over is
    // load-bearing for the visual character
    pipe.clear.bind(gl);
    ctx.uniform1i(pipe.clear.uniform("uTexture"), bufs.pressure.read().attach(gl, 0));
    ctx.uniform1f(pipe.clear.uniform("value"), cfg.pressure);
    gl.blit(Some(bufs.pressure.write()), false);
    bufs.pressure.swap();

    // Jacobi relaxation
    pipe.pressure.bind(gl);
    ctx.uniform2f(
        pipe.pressure.uniform("texelSize"),
        bufs.velocity.texel_x,
        bufs.velocity.texel_y,
    );
    ctx.uniform1i(
        pipe.pressure.uniform("uDivergence"),
        bufs.divergence.attach(gl, 0),
    );
    for _ in 0..cfg.pressure_iterations {
        ctx.uniform1i(
            pipe.pressure.uniform("uPressure"),
            bufs.pressure.read().attach(gl, 1),
        );
        gl.blit(Some(bufs.pressure.write()), false);
        bufs.pressure.swap();
    }

    // make the velocity field approximately divergence-free
    pipe.gradient_subtract.bind(gl);
    ctx.uniform2f(
        pipe.gradient_subtract.uniform("texelSize"),
        bufs.velocity.texel_x,
        bufs.velocity.texel_y,
    );
    ctx.uniform1i(
        pipe.gradient_subtract.uniform("uPressure"),
        bufs.pressure.read().attach(gl, 0),
    );
    ctx.uniform1i(
        pipe.gradient_subtract.uniform("uVelocity"),
        bufs.velocity.read().attach(gl, 1),
    );
    gl.blit(Some(bufs.velocity.write()), false);
    bufs.velocity.swap();

    // velocity self-advection
    pipe.advection.bind(gl);
    ctx.uniform2f(
        pipe.advection.uniform("texelSize"),
        bufs.velocity.texel_x,
        bufs.velocity.texel_y,
    );
    if !gl.linear_filtering {
        ctx.uniform2f(
            pipe.advection.uniform("dyeTexelSize"),
            bufs.velocity.texel_x,
            bufs.velocity.texel_y,
        );
    }
    let velocity_id = bufs.velocity.read().attach(gl, 0);
    ctx.uniform1i(pipe.advection.uniform("uVelocity"), velocity_id);
    ctx.uniform1i(pipe.advection.uniform("uSource"), velocity_id);
    ctx.uniform1f(pipe.advection.uniform("dt"), dt);
    ctx.uniform1f(pipe.advection.uniform("dissipation"), cfg.velocity_dissipation);
    gl.blit(Some(bufs.velocity.write()), false);
    bufs.velocity.swap();

    // dye advection by the updated velocity, with faster decay
    if !gl.linear_filtering {
        ctx.uniform2f(
            pipe.advection.uniform("dyeTexelSize"),
            bufs.dye.texel_x,
            bufs.dye.texel_y,
        );
    }
    ctx.uniform1i(
        pipe.advection.uniform("uVelocity"),
        bufs.velocity.read().attach(gl, 0),
    );
    ctx.uniform1i(pipe.advection.uniform("uSource"), bufs.dye.read().attach(gl, 1));
    ctx.uniform1f(pipe.advection.uniform("dissipation"), cfg.density_dissipation);
    gl.blit(Some(bufs.dye.write()), false);
    bufs.dye.swap();
}

/// Inject one impulse into velocity and dye at texture-space `(x, y)`.
#[allow(clippy::too_many_arguments)]
pub fn splat(
    gl: &Gl,
    pipe: &Pipeline,
    bufs: &mut SimBuffers,
    aspect: f32,
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
    color: Rgb,
    radius: f32,
) {
    let ctx = gl.ctx();
    pipe.splat.bind(gl);
    ctx.uniform1i(pipe.splat.uniform("uTarget"), bufs.velocity.read().attach(gl, 0));
    ctx.uniform1f(pipe.splat.uniform("aspectRatio"), aspect);
    ctx.uniform2f(pipe.splat.uniform("point"), x, y);
    ctx.uniform3f(pipe.splat.uniform("color"), dx, dy, 0.0);
    ctx.uniform1f(pipe.splat.uniform("radius"), radius);
    gl.blit(Some(bufs.velocity.write()), false);
    bufs.velocity.swap();

    ctx.uniform1i(pipe.splat.uniform("uTarget"), bufs.dye.read().attach(gl, 0));
    ctx.uniform3f(pipe.splat.uniform("color"), color.r, color.g, color.b);
    gl.blit(Some(bufs.dye.write()), false);
    bufs.dye.swap();
}

/// Composite dye + hidden image to the screen. The photo rect is measured
/// by the caller from live layout immediately before this call.
#[allow(clippy::too_many_arguments)]
pub fn render(
    gl: &Gl,
    pipe: &Pipeline,
    bufs: &SimBuffers,
    image: Option<(&WebGlTexture, f32)>,
    photo_rect: UvRect,
    rect_aspect: f32,
    shading: bool,
) {
    let ctx = gl.ctx();
    ctx.blend_func(GL::ONE, GL::ONE_MINUS_SRC_ALPHA);
    ctx.enable(GL::BLEND);

    let display = &pipe.display;
    display.bind(gl);

    if shading {
        ctx.uniform2f(
            display.uniform("texelSize"),
            1.0 / ctx.drawing_buffer_width() as f32,
            1.0 / ctx.drawing_buffer_height() as f32,
        );
    }
    ctx.uniform1i(display.uniform("uDye"), bufs.dye.read().attach(gl, 0));

    match image {
        Some((texture, image_aspect)) => {
            ctx.active_texture(GL::TEXTURE1);
            ctx.bind_texture(GL::TEXTURE_2D, Some(texture));
            ctx.uniform1i(display.uniform("uImage"), 1);
            ctx.uniform1f(display.uniform("uImageReady"), 1.0);
            ctx.uniform1f(display.uniform("uImageAspect"), image_aspect);
        }
        None => {
            ctx.uniform1f(display.uniform("uImageReady"), 0.0);
        }
    }

    ctx.uniform4f(
        display.uniform("uPhotoRect"),
        photo_rect.left,
        photo_rect.bottom,
        photo_rect.width,
        photo_rect.height,
    );
    ctx.uniform1f(display.uniform("uRectAspect"), rect_aspect);

    gl.blit(None, true);
}
