//! SVG output: a gallery with one face per day, or the single face of a statement.

use crate::model::format_money;
use crate::pipeline::{
    describe_totals, AggregateTable, Faces, FeatureRanges, StatementFace, VisualParameterSet,
};
use std::fmt::Write;

const CELL_WIDTH: f64 = 280.0;
const CELL_HEIGHT: f64 = 320.0;
const GALLERY_COLUMNS: usize = 4;
const STATEMENT_SIZE: f64 = 400.0;

const FONT: &str = "Helvetica, Arial, sans-serif";
const SKIN: &str = "#ffe0bd";
const HAIR: &str = "#5b3a29";
const NOSE: &str = "#d9a066";

/// Draws every face in `faces` on a grid, in order, left to right and top to bottom. Each face
/// carries a `<title>` tooltip with its date and that day's totals from `table`. With no faces
/// at all, a single neutral face over `ranges` is drawn instead.
pub fn render_gallery(faces: &Faces, table: &AggregateTable, ranges: &FeatureRanges) -> String {
    let count = faces.len().max(1);
    let columns = count.min(GALLERY_COLUMNS);
    let rows = count.div_ceil(GALLERY_COLUMNS);
    let width = columns as f64 * CELL_WIDTH;
    let height = rows as f64 * CELL_HEIGHT;

    let mut svg = String::new();
    open_svg(&mut svg, width, height);

    if faces.is_empty() {
        let _ = writeln!(
            svg,
            "  <g class='face empty' transform='translate({:.1} {:.1})'>",
            width / 2.0,
            height / 2.0 - 10.0
        );
        draw_gallery_face(&mut svg, &VisualParameterSet::neutral(ranges));
        let _ = writeln!(
            svg,
            "    <text y='{:.1}' text-anchor='middle' font-family='{FONT}' font-size='16'>No transactions</text>",
            CELL_HEIGHT / 2.0 - 12.0
        );
        let _ = writeln!(svg, "  </g>");
    }

    for (index, (date, params)) in faces.iter().enumerate() {
        let x = (index % GALLERY_COLUMNS) as f64 * CELL_WIDTH + CELL_WIDTH / 2.0;
        let y = (index / GALLERY_COLUMNS) as f64 * CELL_HEIGHT + CELL_HEIGHT / 2.0 - 10.0;
        let totals = table
            .get(date)
            .map(describe_totals)
            .unwrap_or_else(|| String::from("(none)"));
        let _ = writeln!(
            svg,
            "  <g class='face' transform='translate({x:.1} {y:.1})'>"
        );
        let _ = writeln!(
            svg,
            "    <title>{}</title>",
            escape_text(&format!("{date}: {totals}"))
        );
        draw_gallery_face(&mut svg, params);
        let _ = writeln!(
            svg,
            "    <text y='{:.1}' text-anchor='middle' font-family='{FONT}' font-size='16'>{}</text>",
            CELL_HEIGHT / 2.0 - 12.0,
            escape_text(date.as_str())
        );
        let _ = writeln!(svg, "  </g>");
    }

    close_svg(&mut svg);
    svg
}

fn draw_gallery_face(svg: &mut String, p: &VisualParameterSet) {
    let _ = writeln!(
        svg,
        "    <ellipse rx='90' ry='{:.1}' fill='{SKIN}' stroke='#000' stroke-width='2'/>",
        p.face_radius_y
    );
    for side in [-1.0, 1.0] {
        let _ = writeln!(
            svg,
            "    <ellipse cx='{:.1}' cy='-20' rx='{:.1}' ry='10' fill='#000'/>",
            side * 30.0,
            p.eye_radius_x
        );
        let brow_y = -20.0 - p.eyebrow_y;
        let _ = writeln!(
            svg,
            "    <line x1='{:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}' stroke='#000' stroke-width='3'/>",
            side * 15.0,
            brow_y - 5.0,
            side * 45.0,
            brow_y
        );
    }
    let half = p.mouth_width / 2.0;
    let _ = writeln!(
        svg,
        "    <path d='M{:.1},40Q0,60 {:.1},40' fill='none' stroke='#000' stroke-width='3'/>",
        -half, half
    );
}

/// Draws the statement face. The mouth bends by `smile * 30` and the eyebrows lift by
/// `smile * 10`, so a zero smile is a straight mouth.
pub fn render_statement(face: &StatementFace) -> String {
    let c = STATEMENT_SIZE / 2.0;
    let offset = |points: &[(f64, f64)]| -> Vec<(f64, f64)> {
        points.iter().map(|(x, y)| (c + x, c + y)).collect()
    };
    let outline = offset(&[(-80.0, -90.0), (-70.0, 80.0), (70.0, 80.0), (80.0, -90.0)]);
    let hair = offset(&[
        (-80.0, -90.0),
        (-60.0, -130.0),
        (0.0, -150.0),
        (60.0, -130.0),
        (80.0, -90.0),
        (80.0, -90.0),
    ]);
    let brow = face.smile * 10.0;
    let mouth = face.smile * 30.0;

    let mut svg = String::new();
    open_svg(&mut svg, STATEMENT_SIZE, STATEMENT_SIZE);
    let _ = writeln!(
        svg,
        "  <title>{}</title>",
        escape_text(&format!("Balance {}", format_money(face.balance)))
    );
    let _ = writeln!(
        svg,
        "  <path class='face' d='{}' fill='{SKIN}' stroke='#000' stroke-width='2'/>",
        basis_closed(&outline)
    );
    let _ = writeln!(
        svg,
        "  <path class='hair' d='{}' fill='{HAIR}'/>",
        basis_closed(&hair)
    );
    for side in [-1.0, 1.0] {
        let _ = writeln!(
            svg,
            "  <circle class='eye' cx='{:.1}' cy='{:.1}' r='10' fill='#000'/>",
            c + side * 30.0,
            c - 20.0
        );
        let _ = writeln!(
            svg,
            "  <line x1='{:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}' stroke='#000' stroke-width='3'/>",
            c + side * 45.0,
            c - 40.0 + brow,
            c + side * 15.0,
            c - 45.0 + brow
        );
    }
    let _ = writeln!(
        svg,
        "  <path class='nose' d='M{c:.1},{:.1}L{:.1},{:.1}L{:.1},{:.1}Z' fill='{NOSE}'/>",
        c - 5.0,
        c - 5.0,
        c + 10.0,
        c + 5.0,
        c + 10.0
    );
    let _ = writeln!(
        svg,
        "  <path class='mouth' d='M{:.1},{:.1}Q{c:.1},{:.1} {:.1},{:.1}' fill='none' stroke='#000' stroke-width='3'/>",
        c - 30.0,
        c + 40.0,
        c + 40.0 + mouth,
        c + 30.0,
        c + 40.0
    );
    close_svg(&mut svg);
    svg
}

/// A closed uniform cubic B-spline through the control `points`, as SVG path data.
fn basis_closed(points: &[(f64, f64)]) -> String {
    let n = points.len();
    if n < 3 {
        return String::new();
    }
    let at = |i: usize| points[i % n];
    let mut d = String::new();
    for i in 0..n {
        let (p0, p1, p2, p3) = (at(i), at(i + 1), at(i + 2), at(i + 3));
        if i == 0 {
            let start = (
                (p0.0 + 4.0 * p1.0 + p2.0) / 6.0,
                (p0.1 + 4.0 * p1.1 + p2.1) / 6.0,
            );
            let _ = write!(d, "M{:.1},{:.1}", start.0, start.1);
        }
        let _ = write!(
            d,
            "C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
            (2.0 * p1.0 + p2.0) / 3.0,
            (2.0 * p1.1 + p2.1) / 3.0,
            (p1.0 + 2.0 * p2.0) / 3.0,
            (p1.1 + 2.0 * p2.1) / 3.0,
            (p1.0 + 4.0 * p2.0 + p3.0) / 6.0,
            (p1.1 + 4.0 * p2.1 + p3.1) / 6.0,
        );
    }
    d.push('Z');
    d
}

fn open_svg(svg: &mut String, width: f64, height: f64) {
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.0}' height='{height:.0}' viewBox='0 0 {width:.0} {height:.0}' role='img'>"
    );
    let _ = writeln!(
        svg,
        "  <rect width='{width:.0}' height='{height:.0}' fill='#fff'/>"
    );
}

fn close_svg(svg: &mut String) {
    let _ = writeln!(svg, "</svg>");
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
