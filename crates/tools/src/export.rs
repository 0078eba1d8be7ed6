use foundation::math::Vec2;
use render::{LayerKind, Primitive, Scene, Shape, Style};
use svg::Document;
use svg::Node;
use svg::node::element::path::Data;
use svg::node::element::{Element, Group};

/// Serializes the visible primitives of `scene` in paint order.
///
/// Consecutive primitives of one layer share a `<g class="...">`. Hidden
/// primitives are left out. Titles become `<title>` children and link
/// targets wrap the element in `<a href>`.
pub fn scene_to_svg(scene: &Scene, width: f64, height: f64) -> Document {
    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", format!("0 0 {width} {height}"));
    let mut current: Option<(LayerKind, Group)> = None;

    for primitive in scene.drawn() {
        let Some(node) = primitive_node(primitive) else {
            continue;
        };
        match current.as_mut() {
            Some((kind, group)) if *kind == primitive.layer => group.append(node),
            _ => {
                if let Some((_, group)) = current.take() {
                    doc = doc.add(group);
                }
                let group = Group::new().set("class", primitive.layer.as_str()).add(node);
                current = Some((primitive.layer, group));
            }
        }
    }
    if let Some((_, group)) = current {
        doc = doc.add(group);
    }
    doc
}

fn primitive_node(primitive: &Primitive) -> Option<Element> {
    let open_path = matches!(primitive.shape, Shape::Polyline { .. });
    let mut element = match &primitive.shape {
        Shape::Disk { center, radius } => {
            let mut e = Element::new("circle");
            e.assign("cx", center.x);
            e.assign("cy", center.y);
            e.assign("r", *radius);
            e
        }
        Shape::Polyline { points } => {
            if points.len() < 2 {
                return None;
            }
            let mut e = Element::new("path");
            e.assign("d", ring_data(Data::new(), points, false));
            e
        }
        Shape::Polygon { rings } => {
            let rings: Vec<_> = rings.iter().filter(|r| r.len() >= 3).collect();
            if rings.is_empty() {
                return None;
            }
            let d = rings.into_iter().fold(Data::new(), |d, ring| ring_data(d, ring, true));
            let mut e = Element::new("path");
            e.assign("d", d);
            e.assign("fill-rule", "evenodd");
            e
        }
        Shape::Text {
            anchor,
            text,
            font_size_px,
        } => {
            let mut e = Element::new("text");
            e.assign("x", anchor.x);
            e.assign("y", anchor.y);
            e.assign("font-size", *font_size_px);
            e.assign("dominant-baseline", "middle");
            e.append(svg::node::Text::new(text.as_str()));
            e
        }
    };
    apply_style(&mut element, &primitive.style, open_path);

    if let Some(title) = &primitive.title {
        let mut node = Element::new("title");
        node.append(svg::node::Text::new(title.as_str()));
        element.append(node);
    }
    if let Some(href) = primitive.href() {
        let mut link = Element::new("a");
        link.assign("href", href);
        link.append(element);
        return Some(link);
    }
    Some(element)
}

fn apply_style(element: &mut Element, style: &Style, open_path: bool) {
    match style.fill {
        Some(fill) if !open_path => {
            element.assign("fill", fill.to_hex());
            if style.fill_opacity < 1.0 {
                element.assign("fill-opacity", style.fill_opacity);
            }
        }
        _ => element.assign("fill", "none"),
    }
    if let Some(stroke) = style.stroke {
        element.assign("stroke", stroke.to_hex());
        element.assign("stroke-width", style.stroke_width);
    } else if open_path && let Some(fill) = style.fill {
        element.assign("stroke", fill.to_hex());
    }
}

fn ring_data(d: Data, ring: &[Vec2], closed: bool) -> Data {
    let Some(first) = ring.first() else {
        return d;
    };
    let d = ring[1..]
        .iter()
        .fold(d.move_to((first.x, first.y)), |d, p| d.line_to((p.x, p.y)));
    if closed { d.close() } else { d }
}
