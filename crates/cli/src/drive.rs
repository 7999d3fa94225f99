//! Event loop connecting the controller poller to a navigation root.

use std::io::Write;

use anyhow::Result;
use padnav_engine::{DispatchOutcome, NavigationRoot};
use padnav_types::{NavEvent, NavInput};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::panel::render;

/// How the loop presents frames and when it ends.
pub struct DriveOptions {
    /// Stop after this many controller events.
    pub limit: Option<usize>,
    /// Leave the loop when `Back` reaches the root unhandled.
    pub exit_on_unhandled_back: bool,
    /// Terminal line ending; raw mode needs `\r\n`.
    pub line_ending: &'static str,
    /// Clear the terminal before each frame instead of appending.
    pub redraw: bool,
}

/// Splits `up,down a` style tokens into events.
pub fn parse_script(tokens: &[String]) -> Result<Vec<NavEvent>> {
    tokens
        .iter()
        .flat_map(|token| token.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<NavEvent>().map_err(anyhow::Error::msg))
        .collect()
}

/// Dispatches every received input on the current task, pumps the events
/// nodes posted, and writes a frame after each one. Returns the number of
/// inputs handled.
pub async fn drive(
    root: &mut NavigationRoot,
    mut inputs: mpsc::Receiver<NavInput>,
    quit: CancellationToken,
    options: &DriveOptions,
    out: &mut impl Write,
) -> Result<usize> {
    write_frame(out, options, &render(root, None), None)?;

    let mut handled = 0;
    loop {
        if options.limit.is_some_and(|limit| handled >= limit) {
            break;
        }
        let input = tokio::select! {
            biased;
            _ = quit.cancelled() => break,
            input = inputs.recv() => match input {
                Some(input) => input,
                None => break,
            },
        };
        handled += 1;

        let outcome = root.dispatch(input);
        let follow_ups = root.pump_pending();
        debug!(event = %input.event, outcome = ?outcome, follow_ups = follow_ups.len(), "input handled");
        let status = root.service.take_status();
        let heading = format!("{} -> {}", input.event, describe(&outcome));
        write_frame(out, options, &render(root, status.as_deref()), Some(&heading))?;

        if options.exit_on_unhandled_back && outcome == DispatchOutcome::Unhandled {
            break;
        }
    }
    Ok(handled)
}

fn describe(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Moved(node) => format!("focus {node}"),
        DispatchOutcome::Forwarded => "handled by control".to_owned(),
        DispatchOutcome::Adjusted => "adjusted".to_owned(),
        DispatchOutcome::Activated => "activated".to_owned(),
        DispatchOutcome::ModalClosed => "closed".to_owned(),
        DispatchOutcome::ScopeEntered(group) => format!("entered {group}"),
        DispatchOutcome::ScopeExited(node) => format!("back to {node}"),
        DispatchOutcome::Unhandled => "unhandled".to_owned(),
        DispatchOutcome::Ignored => "ignored".to_owned(),
    }
}

fn write_frame(out: &mut impl Write, options: &DriveOptions, body: &str, heading: Option<&str>) -> Result<()> {
    if options.redraw {
        crossterm::execute!(
            out,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
            crossterm::cursor::MoveTo(0, 0)
        )?;
    }
    let newline = options.line_ending;
    if let Some(heading) = heading {
        write!(out, "[{heading}]{newline}")?;
    }
    for line in body.lines() {
        write!(out, "{line}{newline}")?;
    }
    write!(out, "{newline}")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::SimulatedHardware;
    use crate::panel::build_panel;
    use padnav_input::{ControllerPoller, ReplayBackend};
    use padnav_types::PollerSettings;

    #[test]
    fn script_tokens_accept_commas_and_aliases() {
        let tokens = vec!["down,a".to_owned(), "right".to_owned(), " ,b".to_owned()];
        let events = parse_script(&tokens).unwrap();
        assert_eq!(events, [NavEvent::Down, NavEvent::Activate, NavEvent::Right, NavEvent::Back]);
        assert!(parse_script(&["jump".to_owned()]).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn replayed_script_drives_the_panel() {
        let hardware = SimulatedHardware::new(&[]);
        let mut root = build_panel(&hardware, hardware.discovered_flags()).unwrap();
        let script = [NavEvent::Activate, NavEvent::Activate, NavEvent::Right, NavEvent::Activate];
        let (poller, inputs) = ControllerPoller::spawn(ReplayBackend::from_events(&script), PollerSettings::default());
        let options = DriveOptions {
            limit: Some(script.len()),
            exit_on_unhandled_back: false,
            line_ending: "\n",
            redraw: false,
        };
        let mut out = Vec::new();

        let handled = drive(&mut root, inputs, CancellationToken::new(), &options, &mut out).await.unwrap();
        poller.join().await;

        assert_eq!(handled, script.len());
        assert_eq!(*hardware.tdp.borrow().value(), 16);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[activate -> focus tdp]"), "first input only focuses");
        assert!(text.contains("[right -> adjusted]"));
    }
}
