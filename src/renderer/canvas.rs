//! Canvas 2D renderer for physics world snapshots

use std::collections::HashMap;
use std::f64::consts::TAU;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::settings::Settings;
use crate::sim::{BodySnapshot, Shape, Visual};

const WIREFRAME_COLOR: &str = "#bbbbbb";
const SENSOR_WIREFRAME_COLOR: &str = "#66dd66";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    size: (f64, f64),
    /// Lazily loaded textures, keyed by file name
    images: HashMap<&'static str, HtmlImageElement>,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            ctx,
            size: (canvas.width() as f64, canvas.height() as f64),
            images: HashMap::new(),
        })
    }

    /// Image for `texture` once it has finished loading
    fn image(&mut self, texture: &'static str) -> Option<HtmlImageElement> {
        if !self.images.contains_key(texture) {
            let img = HtmlImageElement::new().ok()?;
            img.set_src(texture);
            log::debug!("Loading texture {}", texture);
            self.images.insert(texture, img);
        }
        self.images.get(texture).filter(|img| img.complete()).cloned()
    }

    /// Draw one frame
    pub fn render(&mut self, bodies: &[BodySnapshot], settings: &Settings) {
        self.ctx.clear_rect(0.0, 0.0, self.size.0, self.size.1);

        for body in bodies {
            self.ctx.save();
            let _ = self
                .ctx
                .translate(body.position.x as f64, body.position.y as f64);
            let _ = self.ctx.rotate(body.angle as f64);

            if settings.wireframes {
                self.draw_outline(body);
            } else if let Some(visual) = body.visual {
                self.draw_visual(body.shape, visual);
            }

            self.ctx.restore();
        }
    }

    fn draw_visual(&mut self, shape: Shape, visual: Visual) {
        if let Some(texture) = visual.texture() {
            if let Shape::Rect { width, height } = shape {
                let (w, h) = (width as f64, height as f64);
                if let Some(img) = self.image(texture) {
                    let _ = self
                        .ctx
                        .draw_image_with_html_image_element_and_dw_and_dh(
                            &img,
                            -w / 2.0,
                            -h / 2.0,
                            w,
                            h,
                        );
                }
            }
            return;
        }

        if let Visual::Fill(color) = visual {
            self.ctx.set_fill_style_str(color);
            self.trace(shape);
            self.ctx.fill();
        }
    }

    fn draw_outline(&self, body: &BodySnapshot) {
        let color = match body.visual {
            None => SENSOR_WIREFRAME_COLOR,
            Some(_) => WIREFRAME_COLOR,
        };
        self.ctx.set_stroke_style_str(color);
        self.trace(body.shape);
        self.ctx.stroke();
    }

    /// Build a path for `shape` centred on the origin
    fn trace(&self, shape: Shape) {
        self.ctx.begin_path();
        match shape {
            Shape::Rect { width, height } => {
                let (w, h) = (width as f64, height as f64);
                self.ctx.rect(-w / 2.0, -h / 2.0, w, h);
            }
            Shape::Circle { radius } => {
                let _ = self.ctx.arc(0.0, 0.0, radius as f64, 0.0, TAU);
            }
        }
    }
}
