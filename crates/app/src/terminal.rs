use std::io::{self, Write};

use sorting_visualiser_core::{Bar, BarBoard, Highlight, Presenter, VisualEvent};

/// Renders the bars as one text row per visible step.
///
/// Each value is followed by a marker: `*` comparing, `~` swapping,
/// `+` written, `^` pivot, `=` sorted.
pub struct TerminalPresenter<W: Write> {
    board: BarBoard,
    out: W,
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            board: BarBoard::default(),
            out,
        }
    }

    fn draw(&mut self, label: &str) {
        let row = render_row(self.board.bars());
        // Rendering is best effort; a closed stdout must not end the run.
        let _ = writeln!(self.out, "{label:>9} | {row}");
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn present(&mut self, event: &VisualEvent) {
        self.board.apply(event);
        match event {
            VisualEvent::Loaded { .. } => self.draw("loaded"),
            VisualEvent::Comparing { .. } => self.draw("compare"),
            VisualEvent::Swapping { .. } => self.draw("swap"),
            VisualEvent::ValueWritten { .. } => self.draw("write"),
            VisualEvent::Sorted { .. } => self.draw("sorted"),
            VisualEvent::Reset { .. } => self.draw("reset"),
            VisualEvent::Aborted { reason } => {
                let _ = writeln!(self.out, "{:>9} | {reason}", "aborted");
            }
            _ => {}
        }
        let _ = self.out.flush();
    }
}

fn render_row(bars: &[Bar]) -> String {
    bars.iter()
        .map(|bar| format!("{:>3}{}", bar.value, marker(bar.highlight)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn marker(highlight: Highlight) -> char {
    match highlight {
        Highlight::None => ' ',
        Highlight::Comparing => '*',
        Highlight::Swapping => '~',
        Highlight::Writing => '+',
        Highlight::Pivot => '^',
        Highlight::Sorted => '=',
    }
}
