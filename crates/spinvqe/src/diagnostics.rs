//! Circuit diagrams.
//!
//! Instructions are packed into columns the same way circuit depth is
//! computed: an instruction occupies every wire between its lowest and
//! highest qubit and lands in the first column free on all of them.
//! Two renderers share that layout: a text diagram for terminals and logs,
//! and an SVG wire diagram written to disk.

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use tracing::info;

use spinvqe_ir::{Circuit, Gate, Instruction, InstructionKind, NoiseChannel, StandardGate};

use crate::error::VqeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Gate,
    Unitary,
    Noise,
}

#[derive(Debug, Clone, PartialEq)]
enum Element {
    /// Boxed operation on one wire.
    Single {
        qubit: usize,
        label: String,
        style: Style,
    },
    /// Control dots joined to an optional ⊕ target.
    Controlled {
        controls: Vec<usize>,
        target: Option<usize>,
    },
    /// One box spanning a range of wires.
    Block { lo: usize, hi: usize, label: String },
}

impl Element {
    fn from_instruction(instruction: &Instruction) -> Self {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        let first = qubits.first().copied().unwrap_or(0);
        match &instruction.kind {
            InstructionKind::Noise(channel) => Element::Single {
                qubit: first,
                label: noise_label(channel),
                style: Style::Noise,
            },
            InstructionKind::Gate(Gate::Standard(StandardGate::CX)) => Element::Controlled {
                controls: vec![first],
                target: qubits.get(1).copied(),
            },
            InstructionKind::Gate(Gate::Standard(StandardGate::CZ)) => Element::Controlled {
                controls: qubits,
                target: None,
            },
            InstructionKind::Gate(Gate::Standard(gate)) => Element::Single {
                qubit: first,
                label: gate_label(gate),
                style: Style::Gate,
            },
            InstructionKind::Gate(Gate::Unitary(gate)) if qubits.len() > 1 => Element::Block {
                lo: qubits.iter().copied().min().unwrap_or(0),
                hi: qubits.iter().copied().max().unwrap_or(0),
                label: gate.name.clone(),
            },
            InstructionKind::Gate(Gate::Unitary(gate)) => Element::Single {
                qubit: first,
                label: gate.name.clone(),
                style: Style::Unitary,
            },
        }
    }

    fn span(&self) -> (usize, usize) {
        match self {
            Element::Single { qubit, .. } => (*qubit, *qubit),
            Element::Controlled { controls, target } => {
                let wires = controls.iter().chain(target.iter()).copied();
                let lo = wires.clone().min().unwrap_or(0);
                let hi = wires.max().unwrap_or(0);
                (lo, hi)
            }
            Element::Block { lo, hi, .. } => (*lo, *hi),
        }
    }
}

fn gate_label(gate: &StandardGate) -> String {
    let name = gate.name().to_uppercase();
    match gate.angle() {
        Some(theta) => format!("{name}({theta:.2})"),
        None => name,
    }
}

fn noise_label(channel: &NoiseChannel) -> String {
    let short = match channel {
        NoiseChannel::Depolarizing { .. } => "DEP",
        NoiseChannel::BitFlip { .. } => "BF",
        NoiseChannel::PhaseFlip { .. } => "PF",
    };
    format!("{short}({:.3})", channel.probability())
}

/// Elements with their column index, plus the column count.
fn layout(circuit: &Circuit) -> (Vec<(usize, Element)>, usize) {
    let mut next_free = vec![0usize; circuit.num_qubits() as usize];
    let mut placed = Vec::with_capacity(circuit.len());
    for instruction in circuit.instructions() {
        let element = Element::from_instruction(instruction);
        let (lo, hi) = element.span();
        let column = next_free[lo..=hi].iter().copied().max().unwrap_or(0);
        for slot in &mut next_free[lo..=hi] {
            *slot = column + 1;
        }
        placed.push((column, element));
    }
    let columns = next_free.into_iter().max().unwrap_or(0);
    (placed, columns)
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Wire,
    Label(String),
    Control,
    Target,
    Through,
}

impl Cell {
    fn text(&self) -> String {
        match self {
            Cell::Wire => "─".into(),
            Cell::Label(s) => format!("[{s}]"),
            Cell::Control => "●".into(),
            Cell::Target => "⊕".into(),
            Cell::Through => "┼".into(),
        }
    }
}

fn center(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    let left = width.saturating_sub(len) / 2;
    let right = width.saturating_sub(len + left);
    let mut out = String::with_capacity(width * 3);
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(fill, right));
    out
}

/// Render `circuit` as a text diagram, one line per qubit.
pub fn render_ascii(circuit: &Circuit) -> String {
    let n = circuit.num_qubits() as usize;
    let (placed, columns) = layout(circuit);
    let mut grid = vec![vec![Cell::Wire; columns]; n];
    // links[q][c]: vertical connector between wires q and q + 1
    let mut links = vec![vec![false; columns]; n.saturating_sub(1)];

    for (column, element) in &placed {
        let (lo, hi) = element.span();
        for link in links.iter_mut().take(hi).skip(lo) {
            link[*column] = true;
        }
        match element {
            Element::Single { qubit, label, .. } => {
                grid[*qubit][*column] = Cell::Label(label.clone());
            }
            Element::Controlled { controls, target } => {
                for row in grid.iter_mut().take(hi + 1).skip(lo) {
                    row[*column] = Cell::Through;
                }
                for &c in controls {
                    grid[c][*column] = Cell::Control;
                }
                if let Some(t) = target {
                    grid[*t][*column] = Cell::Target;
                }
            }
            Element::Block { lo, hi, label } => {
                for row in grid.iter_mut().take(hi + 1).skip(*lo) {
                    row[*column] = Cell::Label(label.clone());
                }
            }
        }
    }

    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            grid.iter()
                .map(|row| row[c].text().chars().count())
                .max()
                .unwrap_or(1)
        })
        .collect();
    let prefix_width = format!("q{}: ", n.saturating_sub(1)).len();

    let mut out = String::new();
    for q in 0..n {
        let mut line = format!("{:<prefix_width$}", format!("q{q}:"));
        for (c, width) in widths.iter().enumerate() {
            line.push('─');
            line.push_str(&center(&grid[q][c].text(), *width, '─'));
            line.push('─');
        }
        line.push('─');
        out.push_str(&line);
        out.push('\n');

        if q + 1 < n {
            let mut gap = " ".repeat(prefix_width);
            for (c, width) in widths.iter().enumerate() {
                let mark = if links[q][c] { "│" } else { " " };
                gap.push(' ');
                gap.push_str(&center(mark, *width, ' '));
                gap.push(' ');
            }
            out.push_str(gap.trim_end());
            out.push('\n');
        }
    }
    out
}

// ---------------------------------------------------------------------------
// SVG
// ---------------------------------------------------------------------------

const MARGIN_LEFT: f64 = 56.0;
const MARGIN_TOP: f64 = 32.0;
const ROW_HEIGHT: f64 = 48.0;
const COLUMN_GAP: f64 = 16.0;
const BOX_HEIGHT: f64 = 28.0;
const CHAR_WIDTH: f64 = 7.0;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn box_width(label: &str) -> f64 {
    (label.chars().count() as f64 * CHAR_WIDTH + 16.0).max(32.0)
}

fn fill(style: Style) -> &'static str {
    match style {
        Style::Gate => "#dbeafe",
        Style::Unitary => "#ede9fe",
        Style::Noise => "#fee2e2",
    }
}

/// Render `circuit` as an SVG wire diagram.
///
/// The drawing uses a 96-dpi user space; `dpi` scales the canvas size.
pub fn render_svg(circuit: &Circuit, dpi: u32) -> String {
    let mut svg = String::new();
    match write_svg(&mut svg, circuit, dpi) {
        Ok(()) => svg,
        Err(_) => String::new(),
    }
}

fn write_svg(out: &mut String, circuit: &Circuit, dpi: u32) -> fmt::Result {
    let n = circuit.num_qubits() as usize;
    let (placed, columns) = layout(circuit);

    let mut widths = vec![24.0f64; columns];
    for (column, element) in &placed {
        let w = match element {
            Element::Single { label, .. } | Element::Block { label, .. } => box_width(label),
            Element::Controlled { .. } => 24.0,
        };
        widths[*column] = widths[*column].max(w);
    }
    let mut centers = Vec::with_capacity(columns);
    let mut x = MARGIN_LEFT + COLUMN_GAP;
    for w in &widths {
        centers.push(x + w / 2.0);
        x += w + COLUMN_GAP;
    }
    let width = x + COLUMN_GAP;
    let height = 2.0 * MARGIN_TOP + ROW_HEIGHT * n.saturating_sub(1) as f64;
    let y = |q: usize| MARGIN_TOP + ROW_HEIGHT * q as f64;
    let scale = f64::from(dpi) / 96.0;

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="monospace" font-size="12">"#,
        width * scale,
        height * scale,
    )?;
    writeln!(out, r#"<title>{}</title>"#, escape(circuit.name()))?;
    writeln!(
        out,
        r#"<rect width="{width:.0}" height="{height:.0}" fill="white"/>"#
    )?;

    for q in 0..n {
        writeln!(
            out,
            r#"<text x="8" y="{:.1}" dominant-baseline="middle">q{q}</text>"#,
            y(q)
        )?;
        writeln!(
            out,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
            MARGIN_LEFT,
            y(q),
            width - 8.0,
            y(q)
        )?;
    }

    for (column, element) in &placed {
        let cx = centers[*column];
        let w = widths[*column];
        match element {
            Element::Single {
                qubit,
                label,
                style,
            } => {
                let dash = if *style == Style::Noise {
                    r#" stroke-dasharray="4 2""#
                } else {
                    ""
                };
                writeln!(
                    out,
                    r#"<rect x="{:.1}" y="{:.1}" width="{w:.1}" height="{BOX_HEIGHT:.1}" fill="{}" stroke="black"{dash}/>"#,
                    cx - w / 2.0,
                    y(*qubit) - BOX_HEIGHT / 2.0,
                    fill(*style),
                )?;
                writeln!(
                    out,
                    r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                    y(*qubit),
                    escape(label)
                )?;
            }
            Element::Controlled { controls, target } => {
                let (lo, hi) = element.span();
                writeln!(
                    out,
                    r#"<line x1="{cx:.1}" y1="{:.1}" x2="{cx:.1}" y2="{:.1}" stroke="black"/>"#,
                    y(lo),
                    y(hi)
                )?;
                for &c in controls {
                    writeln!(
                        out,
                        r#"<circle cx="{cx:.1}" cy="{:.1}" r="5" fill="black"/>"#,
                        y(c)
                    )?;
                }
                if let Some(t) = target {
                    let ty = y(*t);
                    writeln!(
                        out,
                        r#"<circle cx="{cx:.1}" cy="{ty:.1}" r="10" fill="white" stroke="black"/>"#
                    )?;
                    writeln!(
                        out,
                        r#"<path d="M {:.1} {ty:.1} H {:.1} M {cx:.1} {:.1} V {:.1}" stroke="black"/>"#,
                        cx - 10.0,
                        cx + 10.0,
                        ty - 10.0,
                        ty + 10.0
                    )?;
                }
            }
            Element::Block { lo, hi, label } => {
                let top = y(*lo) - BOX_HEIGHT / 2.0;
                let bottom = y(*hi) + BOX_HEIGHT / 2.0;
                writeln!(
                    out,
                    r#"<rect x="{:.1}" y="{top:.1}" width="{w:.1}" height="{:.1}" fill="{}" stroke="black"/>"#,
                    cx - w / 2.0,
                    bottom - top,
                    fill(Style::Unitary),
                )?;
                writeln!(
                    out,
                    r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                    (top + bottom) / 2.0,
                    escape(label)
                )?;
            }
        }
    }

    writeln!(out, "</svg>")
}

/// Timestamp used in diagram file names, e.g. `20260131_142501`.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Write `circuit_{timestamp}.svg` into `out_dir`, creating it if needed.
pub fn draw_circuit(
    circuit: &Circuit,
    out_dir: impl AsRef<Path>,
    timestamp: &str,
    dpi: u32,
) -> VqeResult<PathBuf> {
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("circuit_{timestamp}.svg"));
    std::fs::write(&path, render_svg(circuit, dpi))?;
    info!(path = %path.display(), instructions = circuit.len(), "Circuit diagram written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinvqe_ir::{QubitId, UnitaryGate};

    fn bell() -> Circuit {
        let mut circuit = Circuit::new("bell", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit
    }

    #[test]
    fn test_layout_columns() {
        let mut circuit = Circuit::new("c", 3);
        circuit.ry(0.1, QubitId(0)).unwrap();
        circuit.ry(0.2, QubitId(2)).unwrap();
        circuit.cz(QubitId(0), QubitId(2)).unwrap();
        circuit.x(QubitId(1)).unwrap();
        let (placed, columns) = layout(&circuit);
        let cols: Vec<usize> = placed.iter().map(|(c, _)| *c).collect();
        // the CZ spans wire 1, so X has to wait for it
        assert_eq!(cols, vec![0, 0, 1, 2]);
        assert_eq!(columns, 3);
    }

    #[test]
    fn test_ascii_bell() {
        let text = render_ascii(&bell());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("q0:"));
        assert!(lines[0].contains("[H]"));
        assert!(lines[0].contains('●'));
        assert!(lines[1].contains('│'));
        assert!(lines[2].starts_with("q1:"));
        assert!(lines[2].contains('⊕'));

        // control, connector and target share a column
        let position = |line: &str, c: char| line.chars().position(|x| x == c);
        assert_eq!(position(lines[0], '●'), position(lines[1], '│'));
        assert_eq!(position(lines[1], '│'), position(lines[2], '⊕'));
    }

    #[test]
    fn test_ascii_labels() {
        let mut circuit = Circuit::new("c", 1);
        circuit.ry(0.5, QubitId(0)).unwrap();
        circuit
            .noise(NoiseChannel::PhaseFlip { p: 0.02 }, QubitId(0))
            .unwrap();
        let text = render_ascii(&circuit);
        assert!(text.contains("[RY(0.50)]"));
        assert!(text.contains("[PF(0.020)]"));
    }

    #[test]
    fn test_svg_structure() {
        let mut circuit = bell();
        let identity = UnitaryGate::new(
            "U<&>",
            2,
            (0..16)
                .map(|i| {
                    if i % 5 == 0 {
                        num_complex::Complex64::new(1.0, 0.0)
                    } else {
                        num_complex::Complex64::new(0.0, 0.0)
                    }
                })
                .collect(),
        )
        .unwrap();
        circuit
            .unitary(identity, &[QubitId(0), QubitId(1)])
            .unwrap();

        let svg = render_svg(&circuit, 96);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<title>bell</title>"));
        assert!(svg.contains("U&lt;&amp;&gt;"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn test_svg_dpi_scales_canvas() {
        let small = render_svg(&bell(), 96);
        let large = render_svg(&bell(), 192);
        let width = |svg: &str| -> f64 {
            let start = svg.find("width=\"").unwrap() + 7;
            let end = start + svg[start..].find('"').unwrap();
            svg[start..end].parse().unwrap()
        };
        assert!((width(&large) - 2.0 * width(&small)).abs() <= 1.0);
    }

    #[test]
    fn test_draw_circuit_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output").join("nested");
        let path = draw_circuit(&bell(), &out, "20260101_000000", 150).unwrap();
        assert_eq!(path, out.join("circuit_20260101_000000.svg"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'_');
    }
}
