use foundation::color::Color;
use foundation::math::Vec2;
use render::{Primitive, Scene, Shape};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule};

/// Paints the visible primitives of `scene` in order onto a cleared canvas.
pub fn paint(ctx: &CanvasRenderingContext2d, scene: &Scene, width: f64, height: f64) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, width, height);
    for primitive in scene.drawn() {
        paint_primitive(ctx, primitive)?;
    }
    Ok(())
}

fn paint_primitive(ctx: &CanvasRenderingContext2d, primitive: &Primitive) -> Result<(), JsValue> {
    let style = &primitive.style;
    match &primitive.shape {
        Shape::Text {
            anchor,
            text,
            font_size_px,
        } => {
            let Some(fill) = style.fill else {
                return Ok(());
            };
            ctx_set_fill_style(ctx, &fill.to_hex());
            ctx.set_font(&format!("{font_size_px}px sans-serif"));
            ctx.set_text_baseline("middle");
            ctx.fill_text(text, anchor.x, anchor.y)?;
            return Ok(());
        }
        Shape::Disk { center, radius } => {
            ctx.begin_path();
            ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU)?;
        }
        Shape::Polyline { points } => {
            ctx.begin_path();
            trace_ring(ctx, points, false);
        }
        Shape::Polygon { rings } => {
            ctx.begin_path();
            for ring in rings {
                trace_ring(ctx, ring, true);
            }
        }
    }

    let closed = !matches!(primitive.shape, Shape::Polyline { .. });
    if closed && let Some(fill) = style.fill {
        ctx_set_fill_style(ctx, &rgba_css(fill, style.fill_opacity));
        ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
    }
    let stroke = style.stroke.or(if closed { None } else { style.fill });
    if let Some(stroke) = stroke {
        ctx_set_stroke_style(ctx, &stroke.to_hex());
        ctx.set_line_width(style.stroke_width);
        ctx.stroke();
    }
    Ok(())
}

fn trace_ring(ctx: &CanvasRenderingContext2d, ring: &[Vec2], closed: bool) {
    let Some(first) = ring.first() else {
        return;
    };
    ctx.move_to(first.x, first.y);
    for p in &ring[1..] {
        ctx.line_to(p.x, p.y);
    }
    if closed {
        ctx.close_path();
    }
}

fn ctx_set_fill_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str("fillStyle"), &JsValue::from_str(value));
}

fn ctx_set_stroke_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str("strokeStyle"), &JsValue::from_str(value));
}

/// CSS `rgba()` for a colour at the given opacity.
pub fn rgba_css(color: Color, alpha: f64) -> String {
    format!("rgba({},{},{},{})", color.r, color.g, color.b, alpha.clamp(0.0, 1.0))
}
