use crate::geometry::projection::Projection;
use crate::model::{CountrySet, Polygon};
use crate::scene::SceneStyle;
use std::fmt::Write;

/// One `d` string per polygon, every ring as a closed subpath.
pub fn polygon_path(poly: &Polygon, proj: &Projection) -> Option<String> {
    let mut d = String::new();
    for ring in poly.rings.iter().filter(|r| r.len() >= 2) {
        let mut started = false;
        for p in ring {
            let q = proj.project_point(*p);
            if !q.is_finite() { continue; }
            let cmd = if started { 'L' } else { 'M' };
            if !d.is_empty() { d.push(' '); }
            let _ = write!(d, "{} {:.2} {:.2}", cmd, q.x, q.y);
            started = true;
        }
        if started { d.push_str(" Z"); }
    }
    if d.is_empty() { None } else { Some(d) }
}

pub fn to_svg_paths_impl(countries: &CountrySet, proj: &Projection) -> Vec<String> {
    countries.polygons().filter_map(|p| polygon_path(p, proj)).collect()
}

/// Standalone SVG snapshot of the land layer.
pub fn to_svg_document_impl(countries: &CountrySet, proj: &Projection, style: &SceneStyle) -> String {
    let vp = proj.viewport;
    let mut s = String::new();
    let _ = write!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = vp.width,
        h = vp.height
    );
    for d in to_svg_paths_impl(countries, proj) {
        let _ = write!(
            s,
            "<path d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            d,
            style.land_fill.to_css(),
            style.land_stroke.to_css(),
            style.land_stroke_width
        );
    }
    s.push_str("</svg>");
    s
}
