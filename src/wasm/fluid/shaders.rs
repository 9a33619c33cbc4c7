//! GLSL sources for every fluid pipeline stage. Written against the
//! WebGL1 shading language so the same programs link on both context
//! tiers; keyword variants are selected by prepending `#define` lines.

/// Shared vertex stage: computes the fragment UV and its four cardinal
/// texel neighbors from `texelSize`.
pub const BASE_VERTEX: &str = r#"
    precision highp float;
    attribute vec2 aPosition;
    varying vec2 vUv; varying vec2 vL; varying vec2 vR; varying vec2 vT; varying vec2 vB;
    uniform vec2 texelSize;
    void main () {
        vUv = aPosition * 0.5 + 0.5;
        vL = vUv - vec2(texelSize.x, 0.0); vR = vUv + vec2(texelSize.x, 0.0);
        vT = vUv + vec2(0.0, texelSize.y); vB = vUv - vec2(0.0, texelSize.y);
        gl_Position = vec4(aPosition, 0.0, 1.0);
    }
"#;

pub const COPY_FRAGMENT: &str = r#"
    precision mediump float; precision mediump sampler2D;
    varying highp vec2 vUv; uniform sampler2D uTexture;
    void main () { gl_FragColor = texture2D(uTexture, vUv); }
"#;

/// Multiplies the target by a scalar: the pressure damp between frames.
pub const CLEAR_FRAGMENT: &str = r#"
    precision mediump float; precision mediump sampler2D;
    varying highp vec2 vUv; uniform sampler2D uTexture; uniform float value;
    void main () { gl_FragColor = value * texture2D(uTexture, vUv); }
"#;

/// Gaussian-falloff impulse added into velocity or dye.
pub const SPLAT_FRAGMENT: &str = r#"
    precision highp float; precision highp sampler2D;
    varying vec2 vUv; uniform sampler2D uTarget; uniform float aspectRatio;
    uniform vec3 color; uniform vec2 point; uniform float radius;
    void main () {
        vec2 p = vUv - point.xy; p.x *= aspectRatio;
        vec3 splat = exp(-dot(p, p) / radius) * color;
        vec3 base = texture2D(uTarget, vUv).xyz;
        gl_FragColor = vec4(base + splat, 1.0);
    }
"#;

/// Semi-Lagrangian advection. The MANUAL_FILTERING variant bilinearly
/// samples by hand for hardware without linear float filtering.
pub const ADVECTION_FRAGMENT: &str = r#"
    precision highp float; precision highp sampler2D;
    varying vec2 vUv; uniform sampler2D uVelocity; uniform sampler2D uSource;
    uniform vec2 texelSize; uniform vec2 dyeTexelSize; uniform float dt; uniform float dissipation;
    vec4 bilerp (sampler2D sam, vec2 uv, vec2 tsize) {
        vec2 st = uv / tsize - 0.5; vec2 iuv = floor(st); vec2 fuv = fract(st);
        vec4 a = texture2D(sam, (iuv + vec2(0.5, 0.5)) * tsize);
        vec4 b = texture2D(sam, (iuv + vec2(1.5, 0.5)) * tsize);
        vec4 c = texture2D(sam, (iuv + vec2(0.5, 1.5)) * tsize);
        vec4 d = texture2D(sam, (iuv + vec2(1.5, 1.5)) * tsize);
        return mix(mix(a, b, fuv.x), mix(c, d, fuv.x), fuv.y);
    }
    void main () {
        #ifdef MANUAL_FILTERING
            vec2 coord = vUv - dt * bilerp(uVelocity, vUv, texelSize).xy * texelSize;
            vec4 result = bilerp(uSource, coord, dyeTexelSize);
        #else
            vec2 coord = vUv - dt * texture2D(uVelocity, vUv).xy * texelSize;
            vec4 result = texture2D(uSource, coord);
        #endif
        float decay = 1.0 + dissipation * dt;
        gl_FragColor = result / decay;
    }
"#;

/// Central-difference divergence with reflecting boundaries.
pub const DIVERGENCE_FRAGMENT: &str = r#"
    precision mediump float; precision mediump sampler2D;
    varying highp vec2 vUv; varying highp vec2 vL; varying highp vec2 vR; varying highp vec2 vT; varying highp vec2 vB;
    uniform sampler2D uVelocity;
    void main () {
        float L = texture2D(uVelocity, vL).x; float R = texture2D(uVelocity, vR).x;
        float T = texture2D(uVelocity, vT).y; float B = texture2D(uVelocity, vB).y;
        vec2 C = texture2D(uVelocity, vUv).xy;
        if (vL.x < 0.0) { L = -C.x; } if (vR.x > 1.0) { R = -C.x; }
        if (vT.y > 1.0) { T = -C.y; } if (vB.y < 0.0) { B = -C.y; }
        float div = 0.5 * (R - L + T - B);
        gl_FragColor = vec4(div, 0.0, 0.0, 1.0);
    }
"#;

pub const CURL_FRAGMENT: &str = r#"
    precision mediump float; precision mediump sampler2D;
    varying highp vec2 vUv; varying highp vec2 vL; varying highp vec2 vR; varying highp vec2 vT; varying highp vec2 vB;
    uniform sampler2D uVelocity;
    void main () {
        float L = texture2D(uVelocity, vL).y; float R = texture2D(uVelocity, vR).y;
        float T = texture2D(uVelocity, vT).x; float B = texture2D(uVelocity, vB).x;
        float vorticity = R - L - T + B;
        gl_FragColor = vec4(0.5 * vorticity, 0.0, 0.0, 1.0);
    }
"#;

/// Vorticity confinement: push velocity along the normalized gradient of
/// |curl|, y inverted for screen orientation.
pub const VORTICITY_FRAGMENT: &str = r#"
    precision highp float; precision highp sampler2D;
    varying vec2 vUv; varying vec2 vL; varying vec2 vR; varying vec2 vT; varying vec2 vB;
    uniform sampler2D uVelocity; uniform sampler2D uCurl; uniform float curl; uniform float dt;
    void main () {
        float L = texture2D(uCurl, vL).x; float R = texture2D(uCurl, vR).x;
        float T = texture2D(uCurl, vT).x; float B = texture2D(uCurl, vB).x;
        float C = texture2D(uCurl, vUv).x;
        vec2 force = 0.5 * vec2(abs(T) - abs(B), abs(R) - abs(L));
        force /= length(force) + 0.0001; force *= curl * C; force.y *= -1.0;
        vec2 velocity = texture2D(uVelocity, vUv).xy;
        velocity += force * dt; velocity = min(max(velocity, -1000.0), 1000.0);
        gl_FragColor = vec4(velocity, 0.0, 1.0);
    }
"#;

/// One Jacobi relaxation sweep of the pressure Poisson equation.
pub const PRESSURE_FRAGMENT: &str = r#"
    precision mediump float; precision mediump sampler2D;
    varying highp vec2 vUv; varying highp vec2 vL; varying highp vec2 vR; varying highp vec2 vT; varying highp vec2 vB;
    uniform sampler2D uPressure; uniform sampler2D uDivergence;
    void main () {
        float L = texture2D(uPressure, vL).x; float R = texture2D(uPressure, vR).x;
        float T = texture2D(uPressure, vT).x; float B = texture2D(uPressure, vB).x;
        float divergence = texture2D(uDivergence, vUv).x;
        float pressure = (L + R + B + T - divergence) * 0.25;
        gl_FragColor = vec4(pressure, 0.0, 0.0, 1.0);
    }
"#;

pub const GRADIENT_SUBTRACT_FRAGMENT: &str = r#"
    precision mediump float; precision mediump sampler2D;
    varying highp vec2 vUv; varying highp vec2 vL; varying highp vec2 vR; varying highp vec2 vT; varying highp vec2 vB;
    uniform sampler2D uPressure; uniform sampler2D uVelocity;
    void main () {
        float L = texture2D(uPressure, vL).x; float R = texture2D(uPressure, vR).x;
        float T = texture2D(uPressure, vT).x; float B = texture2D(uPressure, vB).x;
        vec2 velocity = texture2D(uVelocity, vUv).xy;
        velocity.xy -= vec2(R - L, T - B);
        gl_FragColor = vec4(velocity, 0.0, 1.0);
    }
"#;

/// Compositing stage: dye brightness becomes a reveal mask over the hidden
/// image, which is fitted cover/anchor-bottom inside the tracked photo
/// rectangle (uPhotoRect: left, bottom, width, height in UV space). Until
/// the image texture is ready the stage shows raw dye. The SHADING variant
/// adds a pseudo-3D sheen from dye-luminance gradients.
pub const DISPLAY_FRAGMENT: &str = r#"
    precision highp float; precision highp sampler2D;
    varying vec2 vUv; varying vec2 vL; varying vec2 vR; varying vec2 vT; varying vec2 vB;
    uniform sampler2D uDye;
    uniform sampler2D uImage;
    uniform vec2 texelSize;
    uniform float uImageReady;
    uniform float uImageAspect;
    uniform float uRectAspect;
    uniform vec4 uPhotoRect;

    void main () {
        vec3 dye = texture2D(uDye, vUv).rgb;

        #ifdef SHADING
            vec3 lc = texture2D(uDye, vL).rgb; vec3 rc = texture2D(uDye, vR).rgb;
            vec3 tc = texture2D(uDye, vT).rgb; vec3 bc = texture2D(uDye, vB).rgb;
            float dx = length(rc) - length(lc); float dy = length(tc) - length(bc);
            vec3 n = normalize(vec3(dx, dy, length(texelSize)));
            float diffuse = clamp(dot(n, vec3(0.0, 0.0, 1.0)) + 0.7, 0.7, 1.0);
            dye *= diffuse;
        #endif

        float mask = max(dye.r, max(dye.g, dye.b));
        mask = smoothstep(0.0, 0.08, mask);

        if (uImageReady < 0.5) {
            float a = max(dye.r, max(dye.g, dye.b));
            gl_FragColor = vec4(dye, a);
            return;
        }

        vec2 flipped = vec2(vUv.x, 1.0 - vUv.y);
        vec2 photoUv = (flipped - uPhotoRect.xy) / uPhotoRect.zw;

        if (photoUv.x < 0.0 || photoUv.x > 1.0 || photoUv.y < 0.0 || photoUv.y > 1.0) {
            float a = mask * 0.6;
            gl_FragColor = vec4(dye * mask, a);
            return;
        }

        vec2 imageUv = photoUv;
        if (uImageAspect > uRectAspect) {
            float scale = uImageAspect / uRectAspect;
            imageUv.x = (imageUv.x - 0.5) / scale + 0.5;
        } else {
            float scale = uRectAspect / uImageAspect;
            imageUv.y = imageUv.y / scale - (1.0 / scale - 1.0);
        }

        if (imageUv.x < 0.0 || imageUv.x > 1.0 || imageUv.y < 0.0 || imageUv.y > 1.0) {
            float a = mask * 0.6;
            gl_FragColor = vec4(dye * mask, a);
            return;
        }

        vec4 image = texture2D(uImage, imageUv);
        gl_FragColor = vec4(image.rgb * mask, mask);
    }
"#;
