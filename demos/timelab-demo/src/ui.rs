//! Demo UI - Terminal panel and command input

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::cursor::{MoveTo, MoveToNextLine, RestorePosition, SavePosition};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use timelab_core::{targets, MemoryBoard, WorldZoneEntry};
use timelab_runtime::{HostEvent, Notifier};
use timelab_time::resolve_zone;

const BAR_CELLS: usize = 30;

/// Alerts printed above the prompt
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        println!("\n⚠️  {}", message);
        print!("> ");
        let _ = io::stdout().flush();
    }
}

/// Demo UI handler
pub struct DemoUI {
    board: Arc<Mutex<MemoryBoard>>,
    zones: Vec<WorldZoneEntry>,
    events: mpsc::Sender<HostEvent>,
    rendered: watch::Receiver<u64>,
}

impl DemoUI {
    pub fn new(
        board: Arc<Mutex<MemoryBoard>>,
        zones: Vec<WorldZoneEntry>,
        events: mpsc::Sender<HostEvent>,
        rendered: watch::Receiver<u64>,
    ) -> Self {
        Self {
            board,
            zones,
            events,
            rendered,
        }
    }

    /// Run the main UI loop
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();
        let height = panel_lines(&self.board.lock(), &self.zones).len() as u16;
        execute!(stdout, Clear(ClearType::All), MoveTo(0, height + 1))?;
        self.show_help();

        // Redraw the panel after every render
        let board = Arc::clone(&self.board);
        let zones = self.zones.clone();
        let mut rendered = self.rendered.clone();
        let redraw_handle = tokio::spawn(async move {
            while rendered.changed().await.is_ok() {
                let lines = panel_lines(&board.lock(), &zones);
                if draw_panel(&lines).is_err() {
                    break;
                }
            }
        });

        // Main input loop
        let reader = BufReader::new(tokio::io::stdin());
        let mut lines = reader.lines();

        print!("> ");
        io::stdout().flush()?;

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            let mut parts = line.split_whitespace();
            let cmd = parts.next().unwrap_or("");

            match cmd {
                "" => {}
                "/quit" | "/exit" | "/q" => break,
                "/tz" | "/t" => match parts.next() {
                    Some(zone) if zone == "local" || resolve_zone(zone).is_ok() => {
                        self.send(HostEvent::TimezoneChanged(zone.to_string()))
                            .await?;
                    }
                    Some(zone) => println!("Unknown timezone: {}", zone),
                    None => println!("Usage: /tz <local|Area/City>"),
                },
                "/countdown" | "/c" => {
                    // An empty date is passed through so the engine reports it
                    let date = parts.next().unwrap_or("").to_string();
                    let time = parts.next().map(str::to_string);
                    self.send(HostEvent::CountdownSubmitted { date, time })
                        .await?;
                }
                "/help" | "/h" => self.show_help(),
                _ => {
                    println!("Unknown command: {}", cmd);
                    println!("Type /help for available commands");
                }
            }

            print!("> ");
            io::stdout().flush()?;
        }

        redraw_handle.abort();
        let _ = self.events.send(HostEvent::Shutdown).await;
        Ok(())
    }

    async fn send(&self, event: HostEvent) -> Result<(), Box<dyn std::error::Error>> {
        self.events
            .send(event)
            .await
            .map_err(|_| "time lab driver stopped".into())
    }

    fn show_help(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║  Available Commands:                                       ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║  /tz <zone>               - Main clock zone (or local)     ║");
        println!("║  /countdown <date> [time] - Count to YYYY-MM-DD [HH:MM]    ║");
        println!("║  /help                    - Show this help                 ║");
        println!("║  /quit                    - Exit                           ║");
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

/// Draw the panel at the top of the screen, keeping the cursor where it is
fn draw_panel(lines: &[String]) -> io::Result<()> {
    let mut stdout = io::stdout();
    queue!(stdout, SavePosition, MoveTo(0, 0))?;
    for line in lines {
        queue!(
            stdout,
            Clear(ClearType::CurrentLine),
            Print(line),
            MoveToNextLine(1)
        )?;
    }
    queue!(stdout, RestorePosition)?;
    stdout.flush()
}

/// Text-mode rendering of the board
pub fn panel_lines(board: &MemoryBoard, zones: &[WorldZoneEntry]) -> Vec<String> {
    let text = |id: &str| board.text(id).unwrap_or("--").to_string();

    let world = zones
        .iter()
        .map(|entry| format!("{} {}", city_name(&entry.zone), text(&entry.target)))
        .collect::<Vec<_>>()
        .join("   ");

    let countdown = match (
        board.text(targets::COUNTDOWN_LABEL),
        board.text(targets::COUNTDOWN_DETAIL),
    ) {
        (Some(label), Some(detail)) => format!("{}{}", label, detail),
        _ => "No countdown set (/countdown YYYY-MM-DD [HH:MM])".to_string(),
    };

    vec![
        "┌─────────────────────── TimeLab ───────────────────────┐".to_string(),
        format!("  {}   {}", text(targets::CLOCK_TIME), text(targets::CLOCK_DATE)),
        format!("  {}", world),
        format!(
            "  [{}] {}",
            bar(board.width(targets::DAY_PROGRESS_BAR)),
            text(targets::DAY_PROGRESS_TEXT)
        ),
        format!(
            "  [{}] {}",
            bar(board.width(targets::YEAR_PROGRESS_BAR)),
            text(targets::YEAR_PROGRESS_TEXT)
        ),
        format!("  {}", countdown),
        "└────────────────────────────────────────────────────────┘".to_string(),
    ]
}

/// `"Asia/Hong_Kong"` -> `"Hong Kong"`
fn city_name(zone: &str) -> String {
    zone.rsplit('/').next().unwrap_or(zone).replace('_', " ")
}

/// Fixed-width bar for a width such as `"42.50%"`
fn bar(width: Option<&str>) -> String {
    let percent = width
        .and_then(|w| w.trim_end_matches('%').parse::<f64>().ok())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_CELLS as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use timelab_core::DisplayBoard;

    #[test]
    fn test_bar_fill() {
        assert_eq!(bar(None), "░".repeat(BAR_CELLS));
        assert_eq!(bar(Some("100.00%")), "█".repeat(BAR_CELLS));
        assert_eq!(bar(Some("50.00%")).chars().filter(|c| *c == '█').count(), 15);
    }

    #[test]
    fn test_city_name() {
        assert_eq!(city_name("America/New_York"), "New York");
        assert_eq!(city_name("UTC"), "UTC");
    }

    #[test]
    fn test_panel_lines() {
        let mut board = MemoryBoard::standard();
        board.write_text(targets::CLOCK_TIME, "23:00:00");
        board.write_text(targets::TIME_TOKYO, "00:00:00");
        let lines = panel_lines(&board, &WorldZoneEntry::defaults());
        assert_eq!(lines.len(), 7);
        assert!(lines[1].contains("23:00:00"));
        assert!(lines[2].contains("Tokyo 00:00:00"));
        assert!(lines[2].contains("London --"));
        assert!(lines[5].starts_with("  No countdown set"));
    }
}
