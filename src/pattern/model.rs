use crate::foundation::color::Rgb8;
use crate::foundation::units::size_cm;

/// Kind of a single entry in a pattern's command stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StitchKind {
    /// Needle penetration; consecutive stitches form a visible thread line.
    Stitch,
    /// Move without sewing.
    Jump,
    /// Cut the thread.
    Trim,
    /// Machine pause.
    Stop,
    /// Switch to the next thread in the palette.
    ColorChange,
    /// Break between sequences without a color change.
    SequenceBreak,
    /// End of the design.
    End,
}

impl StitchKind {
    /// Whether this command interrupts the current visible stroke.
    pub fn breaks_stroke(self) -> bool {
        !matches!(self, Self::Stitch)
    }
}

/// One command: absolute position in tenths of a millimetre plus its kind.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StitchCommand {
    /// Absolute x in tenths of a millimetre.
    pub x: f64,
    /// Absolute y in tenths of a millimetre.
    pub y: f64,
    /// Command kind.
    pub kind: StitchKind,
}

impl StitchCommand {
    /// Construct a command.
    pub fn new(kind: StitchKind, x: f64, y: f64) -> Self {
        Self { x, y, kind }
    }
}

/// A palette slot. Index `i` is used after the `i`-th color change.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ThreadEntry {
    /// Thread color.
    pub color: Rgb8,
    /// Human readable name.
    #[serde(default)]
    pub description: String,
    /// Manufacturer catalog number.
    #[serde(default)]
    pub catalog_number: String,
}

impl ThreadEntry {
    /// Thread with a color and empty metadata.
    pub fn from_color(color: Rgb8) -> Self {
        Self {
            color,
            description: String::new(),
            catalog_number: String::new(),
        }
    }

    /// Thread with full metadata.
    pub fn new(color: Rgb8, description: impl Into<String>, catalog: impl Into<String>) -> Self {
        Self {
            color,
            description: description.into(),
            catalog_number: catalog.into(),
        }
    }
}

/// Axis-aligned rectangle in tenths of a millimetre.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
}

impl Bounds {
    /// Construct from corners. Callers guarantee `min <= max`.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width (`max_x - min_x`).
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height (`max_y - min_y`).
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// Info-panel view of a pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternSummary {
    /// Number of entries in the command stream (all kinds).
    pub command_count: usize,
    /// Number of `Stitch` commands.
    pub stitch_count: usize,
    /// Palette size, or the color-change fallback when the palette is empty.
    pub color_count: usize,
    /// Physical size, `None` without stitches.
    pub size_cm: Option<(f64, f64)>,
}

/// In-memory embroidery design: an ordered command stream plus a thread palette.
///
/// Bounds are derived from the stitch points and recomputed on every mutation; they cannot be
/// set directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pattern {
    stitches: Vec<StitchCommand>,
    threads: Vec<ThreadEntry>,
    bounds: Option<Bounds>,
}

impl Pattern {
    /// An empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pattern from an existing command stream and palette.
    pub fn from_parts(stitches: Vec<StitchCommand>, threads: Vec<ThreadEntry>) -> Self {
        let bounds = compute_bounds(&stitches);
        Self {
            stitches,
            threads,
            bounds,
        }
    }

    /// The command stream, in draw order.
    pub fn stitches(&self) -> &[StitchCommand] {
        &self.stitches
    }

    /// The thread palette.
    pub fn threads(&self) -> &[ThreadEntry] {
        &self.threads
    }

    /// Bounds over all `Stitch` points; `None` when there are none.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Append a thread to the palette.
    pub fn add_thread(&mut self, thread: ThreadEntry) {
        self.threads.push(thread);
    }

    /// Append a command at an absolute position.
    pub fn add_stitch_absolute(&mut self, kind: StitchKind, x: f64, y: f64) {
        self.push(StitchCommand::new(kind, x, y));
    }

    /// Append a command.
    pub fn push(&mut self, cmd: StitchCommand) {
        if cmd.kind == StitchKind::Stitch && cmd.x.is_finite() && cmd.y.is_finite() {
            match &mut self.bounds {
                Some(b) => b.include(cmd.x, cmd.y),
                None => self.bounds = Some(Bounds::new(cmd.x, cmd.y, cmd.x, cmd.y)),
            }
        }
        self.stitches.push(cmd);
    }

    /// Append several commands.
    pub fn extend(&mut self, cmds: impl IntoIterator<Item = StitchCommand>) {
        for cmd in cmds {
            self.push(cmd);
        }
    }

    /// Number of commands of any kind.
    pub fn len(&self) -> usize {
        self.stitches.len()
    }

    /// `true` when the command stream is empty.
    pub fn is_empty(&self) -> bool {
        self.stitches.is_empty()
    }

    /// Number of `Stitch` commands.
    pub fn stitch_count(&self) -> usize {
        self.count_kind(StitchKind::Stitch)
    }

    /// Number of `ColorChange` commands.
    pub fn color_change_count(&self) -> usize {
        self.count_kind(StitchKind::ColorChange)
    }

    /// Number of colors the design uses.
    ///
    /// The palette length when present; otherwise one more than the number of color changes, or
    /// zero for an empty command stream.
    pub fn color_count(&self) -> usize {
        if !self.threads.is_empty() {
            return self.threads.len();
        }
        if self.stitches.is_empty() {
            return 0;
        }
        self.color_change_count() + 1
    }

    /// A copy with every coordinate multiplied by `s`. The palette is shared by value.
    pub fn scaled(&self, s: f64) -> Self {
        let stitches = self
            .stitches
            .iter()
            .map(|c| StitchCommand::new(c.kind, c.x * s, c.y * s))
            .collect();
        Self::from_parts(stitches, self.threads.clone())
    }

    /// Counts and physical size for display.
    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            command_count: self.len(),
            stitch_count: self.stitch_count(),
            color_count: self.color_count(),
            size_cm: size_cm(self.bounds),
        }
    }

    fn count_kind(&self, kind: StitchKind) -> usize {
        self.stitches.iter().filter(|c| c.kind == kind).count()
    }
}

fn compute_bounds(stitches: &[StitchCommand]) -> Option<Bounds> {
    let mut out: Option<Bounds> = None;
    for c in stitches {
        if c.kind != StitchKind::Stitch || !c.x.is_finite() || !c.y.is_finite() {
            continue;
        }
        match &mut out {
            Some(b) => b.include(c.x, c.y),
            None => out = Some(Bounds::new(c.x, c.y, c.x, c.y)),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/model.rs"]
mod tests;
