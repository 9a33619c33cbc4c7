//! Shader program handles. `Program` is a fixed vertex/fragment pair;
//! `Material` caches one linked program per enabled-keyword set and only
//! re-binds when the selected variant actually changes.

use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::{WebGlProgram, WebGlShader, WebGlUniformLocation};

use super::gl::Gl;

pub struct Program {
    program: WebGlProgram,
    uniforms: HashMap<String, WebGlUniformLocation>,
}

impl Program {
    pub fn new(
        gl: &Gl,
        vertex: &WebGlShader,
        fragment_source: &str,
        keywords: Option<&[&str]>,
    ) -> Result<Program, JsValue> {
        let fragment = gl.compile_shader(
            web_sys::WebGl2RenderingContext::FRAGMENT_SHADER,
            fragment_source,
            keywords,
        )?;
        let program = gl.link_program(vertex, &fragment)?;
        let uniforms = gl.collect_uniforms(&program);
        Ok(Program { program, uniforms })
    }

    pub fn bind(&self, gl: &Gl) {
        gl.ctx().use_program(Some(&self.program));
    }

    pub fn uniform(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.uniforms.get(name)
    }
}

struct Variant {
    program: WebGlProgram,
    uniforms: HashMap<String, WebGlUniformLocation>,
}

/// Keyword-variant shader: one fragment source compiled lazily per feature
/// set, keyed by the canonical (sorted) keyword list.
pub struct Material {
    vertex: WebGlShader,
    fragment_source: String,
    variants: HashMap<Vec<String>, Variant>,
    active: Option<Vec<String>>,
}

impl Material {
    pub fn new(vertex: WebGlShader, fragment_source: &str) -> Material {
        Material {
            vertex,
            fragment_source: fragment_source.to_owned(),
            variants: HashMap::new(),
            active: None,
        }
    }

    /// Select (compiling on first use) the variant for `keywords`. A no-op
    /// when the canonical key already matches the active variant.
    pub fn set_keywords(&mut self, gl: &Gl, keywords: &[&str]) -> Result<(), JsValue> {
        let mut key: Vec<String> = keywords.iter().map(|k| (*k).to_owned()).collect();
        key.sort_unstable();

        if self.active.as_ref() == Some(&key) {
            return Ok(());
        }

        if !self.variants.contains_key(&key) {
            let refs: Vec<&str> = key.iter().map(String::as_str).collect();
            let fragment = gl.compile_shader(
                web_sys::WebGl2RenderingContext::FRAGMENT_SHADER,
                &self.fragment_source,
                Some(&refs),
            )?;
            let program = gl.link_program(&self.vertex, &fragment)?;
            let uniforms = gl.collect_uniforms(&program);
            self.variants.insert(key.clone(), Variant { program, uniforms });
        }

        self.active = Some(key);
        Ok(())
    }

    pub fn bind(&self, gl: &Gl) {
        if let Some(v) = self.active_variant() {
            gl.ctx().use_program(Some(&v.program));
        }
    }

    pub fn uniform(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.active_variant().and_then(|v| v.uniforms.get(name))
    }

    fn active_variant(&self) -> Option<&Variant> {
        self.active.as_ref().and_then(|key| self.variants.get(key))
    }
}
