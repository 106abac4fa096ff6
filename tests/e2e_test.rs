use std::process::Command;
use std::time::Duration;

use expectrl::{Eof, Regex, Session};
use tempfile::TempDir;

// ─── Raw byte constants (what iTerm2/macOS actually sends) ──────────────

const CTRL_Q: &[u8] = b"\x11";      // Ctrl+Q
const CTRL_S: &[u8] = b"\x13";      // Ctrl+S
const CTRL_A: &[u8] = b"\x01";      // Ctrl+A
const CTRL_H: &[u8] = b"\x08";      // Ctrl+H (Ctrl+Backspace on macOS)
const ALT_B: &[u8] = b"\x1bb";      // Alt+B (ESC prefix)
const ALT_G: &[u8] = b"\x1bg";      // Alt+G
const TAB: &[u8] = b"\x09";         // Tab
const BACKTAB: &[u8] = b"\x1b[Z";   // Shift+Tab
const ENTER: &[u8] = b"\r";         // Enter/Return
const END: &[u8] = b"\x1b[F";       // End
const BACKSPACE: &[u8] = b"\x7f";   // Backspace (iTerm2 default = DEL)
const F1: &[u8] = b"\x1bOP";        // F1

// ─── Helpers ─────────────────────────────────────────────────────────────

fn spawn_inkpost(content: &str) -> (Session, TempDir) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("test.md");
    std::fs::write(&file, content).unwrap();

    let bin = env!("CARGO_BIN_EXE_inkpost");
    let mut cmd = Command::new(bin);
    cmd.arg(file.to_str().unwrap());
    cmd.env("TERM", "xterm-256color");

    let mut session = Session::spawn(cmd).expect("Failed to spawn inkpost");
    session.set_expect_timeout(Some(Duration::from_secs(5)));
    (session, dir)
}

/// Small delay to let the TUI render.
fn short_delay() {
    std::thread::sleep(Duration::from_millis(200));
}

/// Send bytes and wait a moment for the TUI to process.
fn send_and_wait(session: &mut Session, bytes: &[u8]) {
    session.send(bytes).expect("Failed to send bytes");
    short_delay();
}

/// Cleanly quit the inkpost process.
fn quit(session: &mut Session) {
    send_and_wait(session, CTRL_Q);
    // Wait for EOF (process exit)
    let _ = session.expect(Eof);
}

// ═══════════════════════════════════════════════════════════════════════
// A. App Lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn app_launches_shows_filename_and_ctrl_q_exits() {
    let (mut session, _dir) = spawn_inkpost("hello world");
    // Wait for the app to render and show the filename
    session
        .expect(Regex("test\\.md"))
        .expect("Should see filename 'test.md' in output");
    // Quit
    send_and_wait(&mut session, CTRL_Q);
    let _ = session.expect(Eof);
}

#[test]
fn app_type_and_save_persists_to_disk() {
    let (mut session, dir) = spawn_inkpost("initial");
    short_delay();
    // Type some text
    session.send(b"ADDED").expect("send text");
    short_delay();
    // Save with Ctrl+S
    send_and_wait(&mut session, CTRL_S);
    // Verify "Saved" appears in status bar
    session
        .expect("Saved")
        .expect("Should see 'Saved' status message");
    // Quit
    quit(&mut session);
    // Verify file on disk contains the added text
    let content = std::fs::read_to_string(dir.path().join("test.md")).unwrap();
    assert!(
        content.contains("ADDED"),
        "File should contain typed text, got: '{}'",
        content
    );
}

#[test]
fn app_shows_initial_status_message() {
    let (mut session, _dir) = spawn_inkpost("hello");
    // The initial status message includes "F1"
    session
        .expect(Regex("F1"))
        .expect("Should show initial status message containing F1");
    quit(&mut session);
}

// ═══════════════════════════════════════════════════════════════════════
// B. Key Encoding Correctness (iTerm2/macOS-specific)
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn ctrl_h_deletes_word_backward() {
    let (mut session, dir) = spawn_inkpost("hello world");
    short_delay();
    // Move cursor to end of line: send End key (ESC[F)
    session.send(END).expect("send End");
    short_delay();
    // Ctrl+H (0x08) should delete word backward
    send_and_wait(&mut session, CTRL_H);
    // Save to check result
    send_and_wait(&mut session, CTRL_S);
    quit(&mut session);
    let content = std::fs::read_to_string(dir.path().join("test.md")).unwrap();
    // "world" should be deleted (or partially)
    assert!(
        !content.contains("world"),
        "Ctrl+H should delete word backward, file still contains 'world': '{}'",
        content
    );
}

#[test]
fn backspace_0x7f_deletes_one_character() {
    let (mut session, dir) = spawn_inkpost("abcde");
    short_delay();
    // Move to end of line
    session.send(END).expect("send End");
    short_delay();
    // Backspace (0x7F = DEL, iTerm2 default)
    send_and_wait(&mut session, BACKSPACE);
    // Save
    send_and_wait(&mut session, CTRL_S);
    quit(&mut session);
    let content = std::fs::read_to_string(dir.path().join("test.md")).unwrap();
    assert_eq!(
        content.trim(),
        "abcd",
        "Backspace should delete one char, got: '{}'",
        content.trim()
    );
}

#[test]
fn esc_returns_to_editor_from_preview() {
    let (mut session, _dir) = spawn_inkpost("# Hello");
    short_delay();
    // Tab → Preview mode
    send_and_wait(&mut session, TAB);
    // Send double-Esc so crossterm parses it as a standalone Esc event
    // (single \x1b causes crossterm to wait for more bytes as an escape sequence prefix)
    session.send(b"\x1b\x1b").expect("send Esc");
    short_delay();
    // Type a char to verify we're back in editor mode (typing only works in editor mode)
    session.send(b"Z").expect("send Z");
    short_delay();
    // Save and verify the typed char was inserted (proves we're in editor mode)
    send_and_wait(&mut session, CTRL_S);
    quit(&mut session);
    let content = std::fs::read_to_string(_dir.path().join("test.md")).unwrap();
    assert!(
        content.contains('Z'),
        "After Esc from Preview, typing should work (editor mode), got: '{}'",
        content
    );
}

#[test]
fn esc_does_not_quit_app() {
    let (mut session, _dir) = spawn_inkpost("hello");
    short_delay();
    // Send double-Esc so crossterm parses as standalone Esc event
    session.send(b"\x1b\x1b").expect("send Esc");
    short_delay();
    assert!(
        session.is_alive().unwrap_or(false),
        "Esc should NOT quit the application"
    );
    // Double Esc — still should not quit
    session.send(b"\x1b\x1b").expect("send Esc again");
    short_delay();
    assert!(
        session.is_alive().unwrap_or(false),
        "Double Esc should NOT quit the application"
    );
    quit(&mut session);
}

#[test]
fn tab_switches_to_preview_mode() {
    let (mut session, _dir) = spawn_inkpost("# Hello");
    short_delay();
    // Tab should switch to Preview mode
    send_and_wait(&mut session, TAB);
    // The PREVIEW tab should now be highlighted / active
    session
        .expect(Regex("PREVIEW"))
        .expect("Tab should show PREVIEW in header");
    quit(&mut session);
}

// ═══════════════════════════════════════════════════════════════════════
// C. Mode Switching
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn shift_tab_is_noop() {
    let (mut session, _dir) = spawn_inkpost("hello");
    short_delay();
    // Shift+Tab (ESC[Z) is not bound to anything
    send_and_wait(&mut session, BACKTAB);
    // App should still be alive and in editor mode
    assert!(
        session.is_alive().unwrap_or(false),
        "App should survive Shift+Tab"
    );
    quit(&mut session);
}

#[test]
fn f1_shows_help_modal() {
    let (mut session, _dir) = spawn_inkpost("hello");
    short_delay();
    // F1 should show help modal
    send_and_wait(&mut session, F1);
    session
        .expect(Regex("Keybindings"))
        .expect("F1 should show help modal with 'Keybindings'");
    // Any key should dismiss
    send_and_wait(&mut session, b"x");
    quit(&mut session);
}

// ═══════════════════════════════════════════════════════════════════════
// D. Formatting Shortcuts
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn alt_b_bolds_selection_and_saves() {
    let (mut session, dir) = spawn_inkpost("hello");
    short_delay();
    send_and_wait(&mut session, CTRL_A);
    send_and_wait(&mut session, ALT_B);
    send_and_wait(&mut session, CTRL_S);
    quit(&mut session);
    let content = std::fs::read_to_string(dir.path().join("test.md")).unwrap();
    assert_eq!(content, "**hello**", "Alt+B should wrap the selection, got: '{}'", content);
}

#[test]
fn alt_g_inserts_image_template() {
    let (mut session, dir) = spawn_inkpost("");
    short_delay();
    send_and_wait(&mut session, ALT_G);
    send_and_wait(&mut session, CTRL_S);
    quit(&mut session);
    let content = std::fs::read_to_string(dir.path().join("test.md")).unwrap();
    assert_eq!(content, "\n![Alt text](image-url)\n");
}

#[test]
fn enter_continues_list_item() {
    let (mut session, dir) = spawn_inkpost("- one");
    short_delay();
    send_and_wait(&mut session, END);
    send_and_wait(&mut session, ENTER);
    session.send(b"two").expect("send text");
    short_delay();
    send_and_wait(&mut session, CTRL_S);
    quit(&mut session);
    let content = std::fs::read_to_string(dir.path().join("test.md")).unwrap();
    assert_eq!(content, "- one\n- two");
}

#[test]
fn missing_file_is_created_on_launch() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("new.md");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_inkpost"));
    cmd.arg(file.to_str().unwrap());
    cmd.env("TERM", "xterm-256color");
    let mut session = Session::spawn(cmd).expect("Failed to spawn inkpost");
    session.set_expect_timeout(Some(Duration::from_secs(5)));
    session
        .expect(Regex("new\\.md"))
        .expect("Should see the new file name");
    quit(&mut session);
    assert!(file.exists());
}

// ═══════════════════════════════════════════════════════════════════════
// E. Error Resilience
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn rapid_key_mashing_does_not_crash() {
    let (mut session, _dir) = spawn_inkpost("hello world");
    short_delay();
    // Send a burst of random-ish bytes
    let garbage: Vec<u8> = (0..100)
        .map(|i| match i % 5 {
            0 => b'a' + (i % 26) as u8,
            1 => b'\x1b',
            2 => b'[',
            3 => b'A',
            _ => b' ',
        })
        .collect();
    session.send(&garbage).expect("send garbage");
    short_delay();
    // App should still be alive
    assert!(
        session.is_alive().unwrap_or(false),
        "App should survive rapid key mashing"
    );
    quit(&mut session);
}

#[test]
fn resize_escape_sequence_does_not_crash() {
    let (mut session, _dir) = spawn_inkpost("hello");
    short_delay();
    // Send a window resize ANSI escape (SIGWINCH is usually sent by the terminal,
    // but we can also send CSI 8 ; rows ; cols t)
    session.send(b"\x1b[8;40;100t").expect("send resize");
    short_delay();
    assert!(
        session.is_alive().unwrap_or(false),
        "App should survive resize sequence"
    );
    quit(&mut session);
}
