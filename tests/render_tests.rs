//! End-to-end rendering tests
//!
//! Each test feeds an instruction stream through the dispatcher into a
//! headless console and checks the resulting screen and the native call log.

use mochi_wincon::console::{HeadlessConsole, NativeCall};
use mochi_wincon::core::{AttributeWord, Color, Coordinate, Style};
use mochi_wincon::{render, ControlCode, EraseMode, Instruction, LegacyTerm};

fn term(columns: usize, rows: usize) -> LegacyTerm<HeadlessConsole> {
    let mut term = LegacyTerm::new(HeadlessConsole::new(columns, rows)).unwrap();
    term.console_mut().take_calls();
    term
}

fn render_json(term: &mut LegacyTerm<HeadlessConsole>, json: &str) {
    let instructions: Vec<Instruction> = serde_json::from_str(json).unwrap();
    render(&instructions, term);
}

#[test]
fn test_plain_stream_only_writes() {
    let mut term = term(40, 5);
    let stream = vec![
        Instruction::text("one "),
        Instruction::text("two\n"),
        Instruction::text("three"),
    ];
    render(&stream, &mut term);

    assert!(term
        .console()
        .calls()
        .iter()
        .all(|call| matches!(call, NativeCall::WriteText(_))));
    assert_eq!(term.console().row_text(0), "one two");
    assert_eq!(term.console().row_text(1), "three");
}

#[test]
fn test_styled_runs_paint_cells_and_restore() {
    let mut term = term(40, 5);
    let stream = vec![
        Instruction::styled("ERR", Style::new().fg(Color::BRIGHT_WHITE).bg(Color::RED)),
        Instruction::text(" plain"),
    ];
    render(&stream, &mut term);

    let console = term.console();
    assert_eq!(console.row_text(0), "ERR plain");
    // bright white (15) on red (console 4)
    assert_eq!(
        console.cell(Coordinate::new(0, 0)).unwrap().attributes,
        AttributeWord(0x4F)
    );
    assert_eq!(
        console.cell(Coordinate::new(0, 4)).unwrap().attributes,
        AttributeWord::CONSOLE_DEFAULT
    );
    assert_eq!(console.attributes(), AttributeWord::CONSOLE_DEFAULT);
}

#[test]
fn test_every_styled_write_is_bracketed() {
    let mut term = term(40, 5);
    let styles = [
        Style::new(),
        Style::new().fg(Color::GREEN),
        Style::new().bg(Color::BLUE),
        Style::new().fg(Color::Rgb(10, 20, 30)).bg(Color::Indexed(200)),
    ];
    let stream: Vec<_> = styles
        .iter()
        .map(|style| Instruction::styled("x", *style))
        .collect();
    render(&stream, &mut term);

    let calls = term.console().calls();
    assert_eq!(calls.len(), styles.len() * 3);
    for triple in calls.chunks(3) {
        assert!(matches!(triple[0], NativeCall::SetTextAttribute(_)));
        assert_eq!(triple[1], NativeCall::WriteText("x".into()));
        assert_eq!(
            triple[2],
            NativeCall::SetTextAttribute(AttributeWord::CONSOLE_DEFAULT)
        );
    }
}

#[test]
fn test_live_progress_redraw() {
    // The pattern a live display uses: draw, return to line start, redraw
    let mut term = term(20, 3);
    render_json(
        &mut term,
        r#"[
            {"Control": ["HideCursor"]},
            {"Text": {"text": "Working 10%"}},
            {"Control": ["CarriageReturn", {"EraseInLine": "WholeLine"}]},
            {"Text": {"text": "Working 100%", "style": {"fg": {"Indexed": 2}}}},
            {"Control": ["ShowCursor"]}
        ]"#,
    );

    let console = term.console();
    assert_eq!(console.row_text(0), "Working 100%");
    assert!(console.cursor_visible());
    assert_eq!(
        console.cell(Coordinate::new(0, 0)).unwrap().attributes,
        AttributeWord(0x02)
    );
}

#[test]
fn test_absolute_positioning_is_one_based() {
    let mut term = term(40, 10);
    render(
        &[
            Instruction::control([ControlCode::MoveTo { x: 5, y: 3 }]),
            Instruction::text("here"),
        ],
        &mut term,
    );
    assert_eq!(term.console().row_text(2), "    here");
}

#[test]
fn test_home_then_overwrite() {
    let mut term = term(40, 10);
    render(
        &[
            Instruction::text("hello\nworld"),
            Instruction::control([ControlCode::Home]),
            Instruction::text("J"),
        ],
        &mut term,
    );
    assert_eq!(term.console().row_text(0), "Jello");
    assert_eq!(term.console().row_text(1), "world");
}

#[test]
fn test_erase_modes_on_screen() {
    let mut term = term(10, 3);
    for (mode, expected) in [
        (EraseMode::ToEnd, "0123"),
        (EraseMode::ToStart, "    456789"),
        (EraseMode::WholeLine, ""),
    ] {
        render(
            &[
                Instruction::control([ControlCode::Home]),
                Instruction::text("0123456789"),
                Instruction::control([
                    ControlCode::MoveTo { x: 5, y: 1 },
                    ControlCode::EraseInLine(mode),
                ]),
            ],
            &mut term,
        );
        assert_eq!(term.console().row_text(0), expected, "{mode:?}");
        assert_eq!(term.console().cursor(), Coordinate::new(0, 4), "{mode:?}");
    }
}

#[test]
fn test_erase_resets_colors() {
    let mut term = term(10, 3);
    render(
        &[
            Instruction::styled("abcdefghij", Style::new().bg(Color::MAGENTA)),
            Instruction::control([ControlCode::Home, ControlCode::EraseInLine(EraseMode::ToEnd)]),
        ],
        &mut term,
    );
    for col in 0..10 {
        let cell = term.console().cell(Coordinate::new(0, col)).unwrap();
        assert_eq!(cell.ch, ' ');
        assert_eq!(cell.attributes, AttributeWord::CONSOLE_DEFAULT);
    }
}

#[test]
fn test_cursor_walk_wraps_around_rows() {
    let mut term = term(4, 4);
    let forward = vec![ControlCode::CursorForward; 5];
    render(&[Instruction::control(forward)], &mut term);
    assert_eq!(term.console().cursor(), Coordinate::new(1, 1));

    let backward = vec![ControlCode::CursorBackward; 2];
    render(&[Instruction::control(backward)], &mut term);
    assert_eq!(term.console().cursor(), Coordinate::new(0, 3));
}

#[test]
fn test_failures_are_counted_not_fatal() {
    let mut term = term(20, 3);
    term.console_mut().fail_on("SetConsoleTextAttribute");
    render(
        &[
            Instruction::styled("a", Style::new().fg(Color::RED)),
            Instruction::text("b"),
        ],
        &mut term,
    );
    assert_eq!(term.failed_calls(), 2);
    assert_eq!(term.console().row_text(0), "ab");
}

#[test]
fn test_title_and_unsupported_controls() {
    let mut term = term(20, 3);
    render_json(
        &mut term,
        r#"[{"Control": ["Bell", {"SetWindowTitle": "Build"}, "Clear", "EnableAltScreen"]}]"#,
    );
    assert_eq!(term.console().title(), "Build");
    assert_eq!(
        term.console().calls(),
        &[NativeCall::SetTitle("Build".into())]
    );
}
