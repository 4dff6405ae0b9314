//! Executes scene draw commands against a 2D canvas context.

use js_sys::{Array, Reflect};
use vecmap::model::{Color, Vec2, Viewport};
use vecmap::scene::{DrawCommand, Glow, Stroke};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn set_fill_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = Reflect::set(ctx.as_ref(), &JsValue::from_str("fillStyle"), &JsValue::from_str(value));
}

fn set_stroke_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = Reflect::set(ctx.as_ref(), &JsValue::from_str("strokeStyle"), &JsValue::from_str(value));
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, s: &Stroke) {
    set_stroke_style(ctx, &s.color.to_css());
    ctx.set_line_width(s.width);
    let dash = Array::new();
    if let Some([on, off]) = s.dash {
        dash.push(&JsValue::from_f64(on));
        dash.push(&JsValue::from_f64(off));
    }
    let _ = ctx.set_line_dash(&dash);
}

fn apply_glow(ctx: &CanvasRenderingContext2d, glow: Option<&Glow>) {
    match glow {
        Some(g) => {
            ctx.set_shadow_color(&g.color.to_css());
            ctx.set_shadow_blur(g.blur);
        }
        None => {
            ctx.set_shadow_color("transparent");
            ctx.set_shadow_blur(0.0);
        }
    }
}

fn trace(ctx: &CanvasRenderingContext2d, points: &[Vec2], closed: bool) {
    ctx.begin_path();
    let mut it = points.iter();
    if let Some(p) = it.next() {
        ctx.move_to(p.x, p.y);
    }
    for p in it {
        ctx.line_to(p.x, p.y);
    }
    if closed {
        ctx.close_path();
    }
}

fn fill_and_stroke(ctx: &CanvasRenderingContext2d, fill: Option<&Color>, stroke: Option<&Stroke>) {
    if let Some(c) = fill {
        set_fill_style(ctx, &c.to_css());
        ctx.fill();
    }
    if let Some(s) = stroke {
        apply_stroke(ctx, s);
        ctx.stroke();
    }
}

/// Resize the backing store to `vp` CSS pixels at `dpr` device pixels each.
pub fn sync_backing(canvas: &HtmlCanvasElement, vp: Viewport, dpr: f64) {
    if !vp.is_drawable() {
        return;
    }
    let w = (vp.width * dpr).round().max(1.0) as u32;
    let h = (vp.height * dpr).round().max(1.0) as u32;
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
}

/// Run one frame. Commands are in CSS pixels; `dpr` scales to the backing store.
pub fn execute(ctx: &CanvasRenderingContext2d, cmds: &[DrawCommand], dpr: f64) {
    for cmd in cmds {
        match cmd {
            DrawCommand::Clear { width, height, color } => {
                let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
                apply_glow(ctx, None);
                ctx.clear_rect(0.0, 0.0, *width, *height);
                if let Some(c) = color {
                    set_fill_style(ctx, &c.to_css());
                    ctx.fill_rect(0.0, 0.0, *width, *height);
                }
            }
            DrawCommand::Line { from, to, stroke } => {
                apply_glow(ctx, None);
                trace(ctx, &[*from, *to], false);
                apply_stroke(ctx, stroke);
                ctx.stroke();
            }
            DrawCommand::Path { points, closed, fill, stroke } => {
                if points.len() < 2 {
                    continue;
                }
                apply_glow(ctx, None);
                trace(ctx, points, *closed);
                fill_and_stroke(ctx, fill.as_ref(), stroke.as_ref());
            }
            DrawCommand::Circle { center, radius, fill, stroke, glow } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    continue;
                }
                apply_glow(ctx, glow.as_ref());
                ctx.begin_path();
                let _ = ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU);
                fill_and_stroke(ctx, fill.as_ref(), stroke.as_ref());
            }
            DrawCommand::Text { pos, text, color, font } => {
                apply_glow(ctx, None);
                ctx.set_font(font);
                set_fill_style(ctx, &color.to_css());
                let _ = ctx.fill_text(text, pos.x, pos.y);
            }
        }
    }
    apply_glow(ctx, None);
}
