fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Non-interactive submission proof mode (deterministic).
    // Writes `stepform_submission_smoke_transcript.log` under the log folder and exits 0/1.
    if args.iter().any(|a| a == "--submission-smoke") {
        stepform::run_submission_smoke();
        return;
    }

    // Non-interactive TUI smoke test mode (for automated checks).
    // Renders a single frame for a specific page and exits 0.
    // Usage: --tui-smoke [page] or --tui-smoke=page (personal|address|account|summary|submitted)
    if let Some(target) = tui_smoke_target(&args) {
        stepform::run_tui_smoke(target);
        return;
    }

    stepform::run_tui();
}

/// `None` when `--tui-smoke` is absent; `Some(None)` when it is present without a page.
fn tui_smoke_target(args: &[String]) -> Option<Option<String>> {
    let idx = args
        .iter()
        .position(|a| a.as_str() == "--tui-smoke" || a.starts_with("--tui-smoke="))?;
    let page = match args[idx].split_once('=') {
        Some((_, v)) => Some(v.to_string()),
        None => args.get(idx + 1).filter(|v| !v.starts_with("--")).cloned(),
    };
    Some(page.filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tui_smoke_page_accepts_both_forms() {
        assert_eq!(
            tui_smoke_target(&args(&["stepform", "--tui-smoke", "summary"])),
            Some(Some("summary".to_string()))
        );
        assert_eq!(
            tui_smoke_target(&args(&["stepform", "--tui-smoke=account"])),
            Some(Some("account".to_string()))
        );
    }

    #[test]
    fn tui_smoke_without_page_or_flag() {
        assert_eq!(tui_smoke_target(&args(&["stepform", "--tui-smoke"])), Some(None));
        assert_eq!(
            tui_smoke_target(&args(&["stepform", "--tui-smoke", "--other"])),
            Some(None)
        );
        assert_eq!(tui_smoke_target(&args(&["stepform", "--tui-smoke="])), Some(None));
        assert_eq!(tui_smoke_target(&args(&["stepform"])), None);
    }
}
