//! `.ine` (cdd H-representation) text IO.
//!
//! Layout: optional name/comment lines (`*` starts a comment), an optional
//! `H-representation` line, `begin`, a `m d numbertype` line with
//! `d = n + 1`, `m` rows `b -a_1 … -a_n`, and `end`. Anything after `end`
//! (cdd options) is ignored. Rationals `p/q` are read as floating point.

use anyhow::{anyhow, bail, ensure, Context, Result};
use polyvol::api::HPolytope;
use std::fs;
use std::path::Path;

fn parse_number(token: &str) -> Result<f64> {
    if let Some((p, q)) = token.split_once('/') {
        let p: f64 = p.parse().with_context(|| format!("bad numerator in {token:?}"))?;
        let q: f64 = q.parse().with_context(|| format!("bad denominator in {token:?}"))?;
        ensure!(q != 0.0, "zero denominator in {token:?}");
        Ok(p / q)
    } else {
        token
            .parse()
            .with_context(|| format!("bad number {token:?}"))
    }
}

/// Rows `[b, -a_1, ..., -a_n]` of an `.ine` document.
pub fn parse_ine(text: &str) -> Result<Vec<Vec<f64>>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('*'));

    loop {
        let (lineno, line) = lines.next().ok_or_else(|| anyhow!("missing `begin`"))?;
        match line {
            "begin" => break,
            "V-representation" => bail!("line {lineno}: V-representation is not supported"),
            l if l.starts_with("linearity") => {
                bail!("line {lineno}: equality (linearity) rows are not supported")
            }
            _ => {}
        }
    }

    let (lineno, header) = lines.next().ok_or_else(|| anyhow!("missing size line after `begin`"))?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    ensure!(
        fields.len() == 3,
        "line {lineno}: expected `rows cols numbertype`, got {header:?}"
    );
    let rows: usize = fields[0]
        .parse()
        .with_context(|| format!("line {lineno}: bad row count"))?;
    let cols: usize = fields[1]
        .parse()
        .with_context(|| format!("line {lineno}: bad column count"))?;
    ensure!(
        matches!(fields[2], "real" | "integer" | "rational"),
        "line {lineno}: unknown number type {:?}",
        fields[2]
    );
    ensure!(cols >= 2, "line {lineno}: need at least one coordinate column");

    let mut out = Vec::with_capacity(rows);
    for _ in 0..rows {
        let (lineno, line) = lines
            .next()
            .ok_or_else(|| anyhow!("expected {rows} rows, found {}", out.len()))?;
        let row = line
            .split_whitespace()
            .map(parse_number)
            .collect::<Result<Vec<f64>>>()
            .with_context(|| format!("line {lineno}"))?;
        ensure!(
            row.len() == cols,
            "line {lineno}: expected {cols} entries, got {}",
            row.len()
        );
        out.push(row);
    }
    match lines.next() {
        Some((_, "end")) => Ok(out),
        Some((lineno, l)) => bail!("line {lineno}: expected `end`, got {l:?}"),
        None => bail!("missing `end`"),
    }
}

pub fn read_polytope(path: &Path) -> Result<HPolytope<f64>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows = parse_ine(&text).with_context(|| format!("parsing {}", path.display()))?;
    HPolytope::from_ine_rows(&rows)
        .with_context(|| format!("building polytope from {}", path.display()))
}

pub fn format_ine(name: &str, polytope: &HPolytope<f64>) -> String {
    let rows = polytope.to_ine_rows();
    let mut lines = vec![
        name.to_owned(),
        "H-representation".to_owned(),
        "begin".to_owned(),
        format!(" {} {} real", rows.len(), polytope.dim() + 1),
    ];
    lines.extend(rows.iter().map(|row| {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        format!(" {}", cells.join(" "))
    }));
    lines.push("end".to_owned());
    lines.join("\n") + "\n"
}

pub fn write_polytope(path: &Path, name: &str, polytope: &HPolytope<f64>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, format_ine(name, polytope))
        .with_context(|| format!("writing {}", path.display()))
}
