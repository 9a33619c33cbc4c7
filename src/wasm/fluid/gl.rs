//! Owning wrapper around the WebGL context: acquisition with the legacy
//! fallback tier, capability/format probing, framebuffer construction and
//! the fullscreen blit. Every pipeline stage receives `&Gl` explicitly —
//! nothing relies on ambient module state.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlFramebuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation,
};

use crate::buffers::RolePair;

/// `HALF_FLOAT_OES` from OES_texture_half_float — the WebGL1 spelling of
/// the half-float texel type.
const HALF_FLOAT_OES: u32 = 0x8D61;

/// Internal format / client format pair chosen by probing.
#[derive(Clone, Copy, Debug)]
pub struct TexFormat {
    pub internal: u32,
    pub format: u32,
}

pub struct Gl {
    ctx: GL,
    pub is_webgl2: bool,
    pub linear_filtering: bool,
    pub half_float_type: u32,
    pub format_rgba: TexFormat,
    pub format_rg: TexFormat,
    pub format_r: TexFormat,
}

fn context_options() -> JsValue {
    let opts = js_sys::Object::new();
    let set = |k: &str, v: bool| {
        js_sys::Reflect::set(&opts, &JsValue::from_str(k), &JsValue::from_bool(v)).ok();
    };
    set("alpha", true);
    set("depth", false);
    set("stencil", false);
    set("antialias", false);
    set("preserveDrawingBuffer", false);
    opts.into()
}

fn raw_context(canvas: &HtmlCanvasElement) -> Option<(GL, bool)> {
    let opts = context_options();
    if let Ok(Some(ctx)) = canvas.get_context_with_context_options("webgl2", &opts) {
        if let Ok(gl) = ctx.dyn_into::<GL>() {
            return Some((gl, true));
        }
    }
    // The legacy tier is driven through the same call surface: only the
    // WebGL1 subset of entry points is used on it (`is_webgl2` guards the
    // rest), mirroring how the capability probing narrows formats below.
    for name in ["webgl", "experimental-webgl"] {
        if let Ok(Some(ctx)) = canvas.get_context_with_context_options(name, &opts) {
            return Some((ctx.unchecked_into::<GL>(), false));
        }
    }
    None
}

impl Gl {
    /// Acquire and probe a context. `None` means the compositor cannot run
    /// here at all; the caller degrades to an inert canvas.
    pub fn acquire(canvas: &HtmlCanvasElement) -> Option<Gl> {
        let (ctx, is_webgl2) = raw_context(canvas)?;

        let has_ext = |name: &str| matches!(ctx.get_extension(name), Ok(Some(_)));

        let (half_float_type, linear_filtering) = if is_webgl2 {
            // enabling the extension is the side effect; support is implied
            let _ = has_ext("EXT_color_buffer_float");
            (GL::HALF_FLOAT, has_ext("OES_texture_float_linear"))
        } else {
            if !has_ext("OES_texture_half_float") {
                log::error!("fluid: half-float textures unsupported");
                return None;
            }
            (HALF_FLOAT_OES, has_ext("OES_texture_half_float_linear"))
        };

        ctx.clear_color(0.0, 0.0, 0.0, 0.0);

        let mut gl = Gl {
            ctx,
            is_webgl2,
            linear_filtering,
            half_float_type,
            // placeholders until probing below
            format_rgba: TexFormat { internal: GL::RGBA, format: GL::RGBA },
            format_rg: TexFormat { internal: GL::RGBA, format: GL::RGBA },
            format_r: TexFormat { internal: GL::RGBA, format: GL::RGBA },
        };

        if is_webgl2 {
            gl.format_rgba = gl.supported_format(&[(GL::RGBA16F, GL::RGBA)])?;
            gl.format_rg = gl.supported_format(&[(GL::RG16F, GL::RG), (GL::RGBA16F, GL::RGBA)])?;
            gl.format_r = gl.supported_format(&[
                (GL::R16F, GL::RED),
                (GL::RG16F, GL::RG),
                (GL::RGBA16F, GL::RGBA),
            ])?;
        } else {
            let rgba = gl.supported_format(&[(GL::RGBA, GL::RGBA)])?;
            gl.format_rgba = rgba;
            gl.format_rg = rgba;
            gl.format_r = rgba;
        }

        if !linear_filtering {
            log::warn!("fluid: linear float filtering unavailable, degrading");
        }

        Some(gl)
    }

    pub fn ctx(&self) -> &GL {
        &self.ctx
    }

    /// Walk the fallback chain and return the first format whose 4×4
    /// render target comes back framebuffer-complete.
    fn supported_format(&self, chain: &[(u32, u32)]) -> Option<TexFormat> {
        for &(internal, format) in chain {
            if self.render_target_complete(internal, format) {
                return Some(TexFormat { internal, format });
            }
        }
        log::error!("fluid: no renderable texture format in fallback chain");
        None
    }

    fn render_target_complete(&self, internal: u32, format: u32) -> bool {
        let gl = &self.ctx;
        let Some(texture) = gl.create_texture() else {
            return false;
        };
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::NEAREST as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::NEAREST as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        if gl
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                GL::TEXTURE_2D,
                0,
                internal as i32,
                4,
                4,
                0,
                format,
                self.half_float_type,
                None,
            )
            .is_err()
        {
            return false;
        }
        let Some(fbo) = gl.create_framebuffer() else {
            return false;
        };
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&fbo));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );
        let complete = gl.check_framebuffer_status(GL::FRAMEBUFFER) == GL::FRAMEBUFFER_COMPLETE;
        gl.delete_framebuffer(Some(&fbo));
        gl.delete_texture(Some(&texture));
        complete
    }

    /// Texture filter for simulation targets given the probed capability.
    pub fn sim_filter(&self) -> u32 {
        if self.linear_filtering {
            GL::LINEAR
        } else {
            GL::NEAREST
        }
    }

    // ── Shaders and programs ────────────────────────────────────

    pub fn compile_shader(
        &self,
        kind: u32,
        source: &str,
        keywords: Option<&[&str]>,
    ) -> Result<WebGlShader, JsValue> {
        let gl = &self.ctx;
        let shader = gl
            .create_shader(kind)
            .ok_or_else(|| JsValue::from_str("createShader failed"))?;
        let source = match keywords {
            Some(kw) if !kw.is_empty() => {
                let defines: String = kw.iter().map(|k| format!("#define {k}\n")).collect();
                format!("{defines}{source}")
            }
            _ => source.to_owned(),
        };
        gl.shader_source(&shader, &source);
        gl.compile_shader(&shader);
        if gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            != Some(true)
        {
            let info = gl.get_shader_info_log(&shader).unwrap_or_default();
            return Err(JsValue::from_str(&format!("shader compile failed: {info}")));
        }
        Ok(shader)
    }

    pub fn link_program(
        &self,
        vertex: &WebGlShader,
        fragment: &WebGlShader,
    ) -> Result<WebGlProgram, JsValue> {
        let gl = &self.ctx;
        let program = gl
            .create_program()
            .ok_or_else(|| JsValue::from_str("createProgram failed"))?;
        gl.attach_shader(&program, vertex);
        gl.attach_shader(&program, fragment);
        gl.link_program(&program);
        if gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            != Some(true)
        {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            return Err(JsValue::from_str(&format!("program link failed: {info}")));
        }
        Ok(program)
    }

    pub fn collect_uniforms(&self, program: &WebGlProgram) -> HashMap<String, WebGlUniformLocation> {
        let gl = &self.ctx;
        let mut uniforms = HashMap::new();
        let count = gl
            .get_program_parameter(program, GL::ACTIVE_UNIFORMS)
            .as_f64()
            .unwrap_or(0.0) as u32;
        for i in 0..count {
            if let Some(info) = gl.get_active_uniform(program, i) {
                if let Some(location) = gl.get_uniform_location(program, &info.name()) {
                    uniforms.insert(info.name(), location);
                }
            }
        }
        uniforms
    }

    // ── Fullscreen quad ─────────────────────────────────────────

    /// Static quad bound once at setup; every blit draws the same two
    /// triangles.
    pub fn init_quad(&self) -> Result<(), JsValue> {
        let gl = &self.ctx;
        let vertices = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("createBuffer failed"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vertices));
        let verts: [f32; 8] = [-1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0];
        gl.buffer_data_with_array_buffer_view(
            GL::ARRAY_BUFFER,
            &js_sys::Float32Array::from(&verts[..]),
            GL::STATIC_DRAW,
        );
        let elements = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("createBuffer failed"))?;
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&elements));
        let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
        gl.buffer_data_with_array_buffer_view(
            GL::ELEMENT_ARRAY_BUFFER,
            &js_sys::Uint16Array::from(&indices[..]),
            GL::STATIC_DRAW,
        );
        gl.vertex_attrib_pointer_with_i32(0, 2, GL::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(0);
        Ok(())
    }

    /// Draw the quad into `target`, or the default framebuffer when `None`.
    pub fn blit(&self, target: Option<&Fbo>, clear: bool) {
        let gl = &self.ctx;
        match target {
            Some(t) => {
                gl.viewport(0, 0, t.width, t.height);
                gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&t.framebuffer));
            }
            None => {
                gl.viewport(0, 0, gl.drawing_buffer_width(), gl.drawing_buffer_height());
                gl.bind_framebuffer(GL::FRAMEBUFFER, None);
            }
        }
        if clear {
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear(GL::COLOR_BUFFER_BIT);
        }
        gl.draw_elements_with_i32(GL::TRIANGLES, 6, GL::UNSIGNED_SHORT, 0);
    }

    // ── Render targets ──────────────────────────────────────────

    pub fn create_fbo(
        &self,
        width: i32,
        height: i32,
        format: TexFormat,
        filter: u32,
    ) -> Result<Fbo, JsValue> {
        let gl = &self.ctx;
        gl.active_texture(GL::TEXTURE0);
        let texture = gl
            .create_texture()
            .ok_or_else(|| JsValue::from_str("createTexture failed"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, filter as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, filter as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            format.internal as i32,
            width,
            height,
            0,
            format.format,
            self.half_float_type,
            None,
        )?;
        let framebuffer = gl
            .create_framebuffer()
            .ok_or_else(|| JsValue::from_str("createFramebuffer failed"))?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );
        gl.viewport(0, 0, width, height);
        gl.clear(GL::COLOR_BUFFER_BIT);
        Ok(Fbo {
            texture,
            framebuffer,
            width,
            height,
            texel_x: 1.0 / width as f32,
            texel_y: 1.0 / height as f32,
        })
    }

    pub fn create_double_fbo(
        &self,
        width: i32,
        height: i32,
        format: TexFormat,
        filter: u32,
    ) -> Result<DoubleFbo, JsValue> {
        let read = self.create_fbo(width, height, format, filter)?;
        let write = self.create_fbo(width, height, format, filter)?;
        Ok(DoubleFbo {
            width,
            height,
            texel_x: read.texel_x,
            texel_y: read.texel_y,
            pair: RolePair::new(read, write),
        })
    }
}

/// One off-screen render target.
pub struct Fbo {
    pub texture: WebGlTexture,
    pub framebuffer: WebGlFramebuffer,
    pub width: i32,
    pub height: i32,
    pub texel_x: f32,
    pub texel_y: f32,
}

impl Fbo {
    /// Bind this target's texture to `unit` and return the unit index for
    /// a sampler uniform.
    pub fn attach(&self, gl: &Gl, unit: u32) -> i32 {
        let ctx = gl.ctx();
        ctx.active_texture(GL::TEXTURE0 + unit);
        ctx.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        unit as i32
    }
}

/// Double-buffered target: swapping exchanges read/write roles only.
pub struct DoubleFbo {
    pub width: i32,
    pub height: i32,
    pub texel_x: f32,
    pub texel_y: f32,
    pair: RolePair<Fbo>,
}

impl DoubleFbo {
    pub fn read(&self) -> &Fbo {
        self.pair.read()
    }

    pub fn write(&self) -> &Fbo {
        self.pair.write()
    }

    pub fn swap(&mut self) {
        self.pair.swap();
    }

    pub fn replace(&mut self, read: Fbo, write: Fbo) {
        self.width = read.width;
        self.height = read.height;
        self.texel_x = read.texel_x;
        self.texel_y = read.texel_y;
        self.pair.replace(read, write);
    }
}
