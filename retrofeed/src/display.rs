///! Timed terminal output
///!
///! Every character that reaches the screen goes through a [`Typewriter`]:
///! one character at a time, flushed, followed by a configured delay.

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crate::config::ConfigScope;
use crate::error::ConfigError;

/// Timing and geometry for one feed's output
#[derive(Debug, Clone, PartialEq)]
pub struct Pacing {
    pub line_width: usize,
    /// After every character, and after each line terminator
    pub print_delay: Duration,
    /// After every space of a pause row
    pub newline_delay: Duration,
    /// Extra hesitation at one random position of a pause row
    pub pause_time: Duration,
    /// Between the dots of an update banner
    pub subsegment_delay: Duration,
}

impl Pacing {
    pub fn from_scope(scope: &ConfigScope) -> Result<Self, ConfigError> {
        Ok(Self {
            line_width: scope.usize("line_width")?,
            print_delay: scope.seconds("print_delay")?,
            newline_delay: scope.seconds("newline_delay")?,
            pause_time: scope.seconds("pause_time")?,
            subsegment_delay: scope.seconds("subsegment_delay")?,
        })
    }

    /// No delays at all; handy for tests and dry runs
    pub fn instant(line_width: usize) -> Self {
        Self {
            line_width,
            print_delay: Duration::ZERO,
            newline_delay: Duration::ZERO,
            pause_time: Duration::ZERO,
            subsegment_delay: Duration::ZERO,
        }
    }
}

/// The output device: a byte sink plus the randomness used for pause rows
pub struct Terminal {
    out: Box<dyn Write + Send>,
    rng: StdRng,
}

impl Terminal {
    pub fn new(out: impl Write + Send + 'static, rng: StdRng) -> Self {
        Self {
            out: Box::new(out),
            rng,
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout(), StdRng::from_os_rng())
    }

    /// Clear the screen and home the cursor
    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    /// Write without any pacing
    pub fn write_untimed(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.out.flush()
    }

    pub fn typewriter<'a>(&'a mut self, pacing: &'a Pacing) -> Typewriter<'a> {
        Typewriter {
            terminal: self,
            pacing,
        }
    }
}

/// A terminal bound to one feed's pacing
pub struct Typewriter<'a> {
    terminal: &'a mut Terminal,
    pacing: &'a Pacing,
}

impl Typewriter<'_> {
    /// Type `s` followed by `end`. Lines wider than the display are
    /// word-wrapped first and each piece gets its own `end`.
    pub async fn render_text(&mut self, s: &str, end: &str) -> io::Result<()> {
        for line in wrap_text(s, self.pacing.line_width) {
            self.type_line(&line, end).await?;
        }
        Ok(())
    }

    async fn type_line(&mut self, line: &str, end: &str) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for c in line.chars() {
            self.put(c.encode_utf8(&mut buf))?;
            pause(self.pacing.print_delay).await;
        }
        self.put(end)?;
        pause(self.pacing.print_delay).await;
        Ok(())
    }

    /// A full-width blank row typed one space at a time, hesitating once at
    /// a random column to vary what stays lit on the screen.
    pub async fn render_pause_row(&mut self) -> io::Result<()> {
        let width = self.pacing.line_width;
        let pause_at = (width > 0).then(|| self.terminal.rng.random_range(0..width));

        for column in 0..width {
            self.put(" ")?;
            pause(self.pacing.newline_delay).await;
            if pause_at == Some(column) {
                pause(self.pacing.pause_time).await;
            }
        }
        self.put("\n")?;
        pause(self.pacing.print_delay).await;
        Ok(())
    }

    /// `[label...]` with a slow ellipsis, then a pause row
    pub async fn render_update_banner(&mut self, label: &str) -> io::Result<()> {
        self.render_text(&format!("[{}", label), "").await?;
        for _ in 0..3 {
            pause(self.pacing.subsegment_delay).await;
            self.render_text(".", "").await?;
        }
        pause(self.pacing.subsegment_delay).await;
        self.render_text("]", "\n").await?;
        self.render_pause_row().await
    }

    fn put(&mut self, s: &str) -> io::Result<()> {
        self.terminal.out.write_all(s.as_bytes())?;
        self.terminal.out.flush()
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Greedy word wrap to `width` characters.
///
/// Text that already fits (or a width of zero) comes back as a single line.
/// The first line keeps its indentation and every line keeps the spacing
/// between its words; whitespace is only dropped where a line is broken.
/// Words longer than `width` are split across lines.
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 || s.chars().count() <= width {
        return vec![s.to_string()];
    }

    let mut chunks = split_chunks(s);
    let mut lines: Vec<String> = Vec::new();

    while !chunks.is_empty() {
        if !lines.is_empty() && chunks.front().is_some_and(|c| is_blank(c)) {
            chunks.pop_front();
        }

        let mut line: Vec<char> = Vec::new();
        while let Some(chunk) = chunks.front() {
            if line.len() + chunk.len() > width {
                break;
            }
            line.extend(chunk);
            chunks.pop_front();
        }

        // A chunk wider than the display never fits; fill the rest of the line with its head
        if let Some(chunk) = chunks.front_mut() {
            if chunk.len() > width {
                let head = width - line.len();
                line.extend(chunk.drain(..head));
            }
        }

        while line.last() == Some(&' ') {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(line.into_iter().collect());
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Alternating runs of whitespace and non-whitespace. Whitespace becomes
/// plain spaces so every chunk's width is its character count.
fn split_chunks(s: &str) -> VecDeque<Vec<char>> {
    let mut chunks: VecDeque<Vec<char>> = VecDeque::new();
    for c in s.chars() {
        let blank = c.is_whitespace();
        let c = if blank { ' ' } else { c };
        match chunks.back_mut() {
            Some(chunk) if is_blank(chunk) == blank => chunk.push(c),
            _ => chunks.push_back(vec![c]),
        }
    }
    chunks
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.first() == Some(&' ')
}


#[cfg(test)]
mod tests {
    use super::testing::capture_terminal;
    use super::*;
    use tokio::time::Instant;

    fn slow_pacing() -> Pacing {
        Pacing {
            line_width: 10,
            print_delay: Duration::from_millis(10),
            newline_delay: Duration::from_millis(2),
            pause_time: Duration::from_millis(500),
            subsegment_delay: Duration::from_millis(100),
        }
    }

    fn assert_elapsed(start: Instant, expected: Duration, sleeps: u32) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed <= expected + Duration::from_millis(sleeps as u64),
            "expected about {:?}, got {:?}",
            expected,
            elapsed
        );
    }

    #[test]
    fn test_wrap_text_fits() {
        assert_eq!(wrap_text("hello", 10), vec!["hello"]);
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("no wrapping at all here", 0), vec!["no wrapping at all here"]);
    }

    #[test]
    fn test_wrap_text_greedy() {
        assert_eq!(
            wrap_text("the quick brown fox jumps over the lazy dog", 10),
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
        assert_eq!(wrap_text("a  b   c d e f", 5), vec!["a  b", "c d e", "f"]);
    }

    #[test]
    fn test_wrap_text_keeps_indent_and_alignment() {
        assert_eq!(
            wrap_text("    Conditions   Thunderstorms and Rain and Fog/Mist", 40),
            vec!["    Conditions   Thunderstorms and Rain", "and Fog/Mist"]
        );
        assert_eq!(
            wrap_text("      From 10° above NW   then   low in the SE sky", 24),
            vec!["      From 10° above NW", "then   low in the SE sky"]
        );
    }

    #[test]
    fn test_wrap_text_breaks_long_words() {
        assert_eq!(
            wrap_text("ok supercalifragilistic", 8),
            vec!["ok super", "califrag", "ilistic"]
        );
        for line in wrap_text("Headline: supercalifragilisticexpialidocious news at eleven", 12) {
            assert!(line.chars().count() <= 12, "{:?}", line);
        }
    }

    #[tokio::test]
    async fn test_render_text_writes_text_and_terminator() {
        let (mut terminal, buffer) = capture_terminal();
        let pacing = Pacing::instant(40);
        let mut tty = terminal.typewriter(&pacing);
        tty.render_text("It is Monday", "\n").await.unwrap();
        tty.render_text("[Updating", "").await.unwrap();
        assert_eq!(buffer.contents(), "It is Monday\n[Updating");
    }

    #[tokio::test]
    async fn test_render_text_wraps_each_line_with_terminator() {
        let (mut terminal, buffer) = capture_terminal();
        let pacing = Pacing::instant(10);
        terminal
            .typewriter(&pacing)
            .render_text("the quick brown fox", "\n")
            .await
            .unwrap();
        assert_eq!(buffer.contents(), "the quick\nbrown fox\n");
    }

    #[tokio::test]
    async fn test_pause_row_is_full_width() {
        let (mut terminal, buffer) = capture_terminal();
        let pacing = Pacing::instant(12);
        terminal.typewriter(&pacing).render_pause_row().await.unwrap();
        assert_eq!(buffer.contents(), format!("{}\n", " ".repeat(12)));
    }

    #[tokio::test]
    async fn test_pause_row_zero_width() {
        let (mut terminal, buffer) = capture_terminal();
        let pacing = Pacing::instant(0);
        terminal.typewriter(&pacing).render_pause_row().await.unwrap();
        assert_eq!(buffer.contents(), "\n");
    }

    #[tokio::test]
    async fn test_update_banner_layout() {
        let (mut terminal, buffer) = capture_terminal();
        let pacing = Pacing::instant(20);
        terminal
            .typewriter(&pacing)
            .render_update_banner("Updating news")
            .await
            .unwrap();
        assert_eq!(
            buffer.contents(),
            format!("[Updating news...]\n{}\n", " ".repeat(20))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_text_timing_is_deterministic() {
        let (mut terminal, _buffer) = capture_terminal();
        let pacing = slow_pacing();

        let start = Instant::now();
        terminal.typewriter(&pacing).render_text("abcd", "\n").await.unwrap();
        // Four characters plus the terminator
        assert_elapsed(start, Duration::from_millis(50), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_row_timing_includes_one_pause() {
        let (mut terminal, _buffer) = capture_terminal();
        let pacing = slow_pacing();

        let start = Instant::now();
        terminal.typewriter(&pacing).render_pause_row().await.unwrap();
        // 10 spaces, one hesitation, then the newline
        assert_elapsed(start, Duration::from_millis(10 * 2 + 500 + 10), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_banner_timing() {
        let (mut terminal, _buffer) = capture_terminal();
        let pacing = slow_pacing();

        let start = Instant::now();
        terminal.typewriter(&pacing).render_update_banner("News").await.unwrap();
        // "[News" (5 chars + empty terminator), three dots, "]" + newline,
        // four subsegment waits, then a pause row
        let typing = Duration::from_millis(10) * (6 + 3 * 2 + 2);
        let waits = Duration::from_millis(100) * 4;
        let row = Duration::from_millis(10 * 2 + 500 + 10);
        assert_elapsed(start, typing + waits + row, 40);
    }
}
