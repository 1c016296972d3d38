mod terminal;

use std::fs::File;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use reflow::dom::ColumnSpec;
use reflow::{MemoryHost, ReflowConfig, TranspositionEngine};
use simplelog::{Config, LevelFilter, WriteLogger};
use unicode_width::UnicodeWidthStr;

use terminal::Terminal;

/// Lines above the table: title and a blank line.
const TABLE_TOP: u16 = 2;

/// Gap between columns.
const COLUMN_GAP: u32 = 2;

const HEADERS: [&str; 6] = ["Name", "Email", "Phone", "City", "Role", "Notes"];

const ROWS: [[&str; 6]; 5] = [
    ["Ada", "ada@example.org", "+44 20 7946 0018", "London", "Analyst", "Prefers mail"],
    ["Grace", "grace@example.org", "+1 202 555 0143", "Arlington", "Admiral", "On leave"],
    ["Linus", "linus@example.org", "+358 9 4289 1021", "Helsinki", "Maintainer", "-"],
    ["Barbara", "barbara@example.org", "+1 617 555 0199", "Boston", "Professor", "Mentor"],
    ["Ken", "ken@example.org", "+1 908 555 0112", "Murray Hill", "Researcher", "Remote"],
];

fn main() -> std::io::Result<()> {
    // Set up file logging
    let log_file = File::create("reflow-demo.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut term = Terminal::new()?;

    let mut host = build_host(u32::from(term.width()?));
    let config = ReflowConfig::default()
        .width_margin(4)
        .indicator_styles("collapsed", "expanded");
    let mut engine = match TranspositionEngine::mount(&mut host, config) {
        Ok(engine) => engine,
        Err(err) => {
            drop(term);
            eprintln!("{err}");
            return Ok(());
        }
    };

    loop {
        term.draw(
            "Resize the terminal. 1-5 or click toggles a row, 'q' quits.",
            &host.render_lines(&engine.config().expanded_indicator_style),
        )?;

        for event in term.poll(Duration::from_millis(250))? {
            match event {
                Event::Key(KeyEvent {
                    code: KeyCode::Char('q') | KeyCode::Esc,
                    ..
                }) => return Ok(()),
                Event::Key(KeyEvent {
                    code: KeyCode::Char(c),
                    ..
                }) => {
                    if let Some(row) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                        toggle(&mut engine, &mut host, row);
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    row: y,
                    ..
                }) => {
                    if let Some(row) = row_at_line(&engine, y) {
                        toggle(&mut engine, &mut host, row);
                    }
                }
                Event::Resize(width, _) => {
                    host.resize_parent(u32::from(width));
                    if let Err(err) = engine.handle_resize(&mut host) {
                        log::error!("[demo] resize to {width} failed: {err}");
                    }
                }
                _ => {}
            }
        }
    }
}

fn build_host(parent_width: u32) -> MemoryHost {
    let columns = HEADERS
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let widest = ROWS
                .iter()
                .map(|row| row[col].width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0);
            ColumnSpec::new(*header, widest as u32 + COLUMN_GAP)
        })
        .collect();

    MemoryHost::with_table(parent_width, columns, ROWS)
}

fn toggle(engine: &mut TranspositionEngine, host: &mut MemoryHost, row: usize) {
    if !engine.is_transposed() {
        return;
    }
    match engine.toggle_row(host, row) {
        Ok(visible) => log::debug!("[demo] row {row} expanded={visible}"),
        Err(err) => log::warn!("[demo] toggling row {row}: {err}"),
    }
}

/// Original row drawn at screen line `y`, counting the detail lines of
/// expanded rows above it.
fn row_at_line(engine: &TranspositionEngine, y: u16) -> Option<usize> {
    // First table line is the header.
    let mut line = y.checked_sub(TABLE_TOP + 1)? as usize;

    for row in 0..engine.row_count() {
        if line == 0 {
            return Some(row);
        }
        line -= 1;

        let details = engine
            .auxiliary_rows()
            .get(row)
            .filter(|aux| aux.is_visible())
            .map_or(0, |aux| aux.shown_columns().len());
        if line < details {
            return Some(row);
        }
        line -= details;
    }

    None
}
