//! `conemap required`: propagate required times through a mapped network.
//!
//! 1. Load config from `--config` (default `conemap.toml`)
//! 2. Read the network JSON and validate its structure
//! 3. Apply `required.output` to every output, if set
//! 4. Run both propagation passes; a broken cut becomes an error diagnostic
//! 5. With `--check`, re-derive the result and report inconsistencies
//! 6. Render diagnostics and print the report

use std::path::Path;

use conemap_aig::{Network, NodeId, TopoOrder};
use conemap_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use conemap_timing::{
    check_required_times, propagate_required, DelayTable, PropagationParams, RequiredReport,
    RequiredViolation,
};
use tracing::debug;

use crate::{GlobalArgs, ReportFormat, RequiredArgs};

/// Runs the `conemap required` command.
///
/// Returns exit code 0 on success, 1 if diagnostics contain errors, which
/// includes propagation failures and inconsistencies found by `--check`.
pub fn run(args: &RequiredArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = conemap_config::load_config(&global.config)?;
    let mut network = load_network(&args.network, config.mapper.max_cut_size)?;

    if let Some(required) = config.required.output {
        debug!(required, "overriding output required times");
        network.set_output_required(required);
    }

    if !global.quiet {
        eprintln!(
            "  Propagating {} ({} nodes)",
            args.network.display(),
            network.len()
        );
    }

    let order = TopoOrder::of(&network);
    let delays = DelayTable::from_config(&config);
    let params = PropagationParams::from_config(&config);
    let sink = DiagnosticSink::new();
    let report = match propagate_required(&mut network, &order, &delays, &params, &sink) {
        Ok(report) => Some(report),
        Err(err) => {
            sink.emit(err.to_diagnostic());
            None
        }
    };

    let violations = if args.check && report.is_some() {
        check_required_times(&network, &delays)
    } else {
        Vec::new()
    };
    for violation in &violations {
        sink.emit(violation.to_diagnostic());
    }

    let diagnostics = sink.take_all();
    match args.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            let name = |raw: u32| network.display_name(NodeId::from_raw(raw));
            for diag in diagnostics.iter().filter(|d| !global.quiet || d.severity.is_error()) {
                eprint!("{}", renderer.render(diag, &name));
            }
            if let Some(report) = &report {
                println!("{report}");
            }
        }
        ReportFormat::Json => {
            let json = render_json(report.as_ref(), &diagnostics, &violations, args.check);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Result: {} error(s), {} warning(s){}",
            sink.error_count(),
            sink.warning_count(),
            if args.check {
                format!(", {} inconsistency(ies)", violations.len())
            } else {
                String::new()
            }
        );
    }

    if sink.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Reads a network from JSON and checks its structural contract.
fn load_network(path: &Path, max_cut_size: usize) -> Result<Network, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let network: Network = serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    network.validate(max_cut_size)?;
    Ok(network)
}

/// `report` is `null` when propagation failed; the reason is in `diagnostics`.
fn render_json(
    report: Option<&RequiredReport>,
    diagnostics: &[Diagnostic],
    violations: &[RequiredViolation],
    checked: bool,
) -> serde_json::Value {
    let mut json = serde_json::json!({
        "report": report,
        "diagnostics": diagnostics,
    });
    if checked {
        json["violations"] = serde_json::json!(violations);
    }
    json
}

#[cfg(test)]
mod tests {
    use super::*;
    use conemap_timing::{RequiredTimeError, NEGATIVE_INPUT_REQUIRED};
    use std::path::PathBuf;

    const NETWORK: &str = r#"{
  "nodes": [
    { "id": 0, "kind": "primary_input", "name": "a" },
    { "id": 1, "kind": "primary_input", "name": "b" },
    { "id": 2, "kind": "primary_input", "name": "c" },
    { "id": 3, "kind": "and_gate", "fanin0": { "node": 0 }, "fanin1": { "node": 1, "complemented": true } },
    { "id": 4, "kind": "and_gate", "fanin0": { "node": 3 }, "fanin1": { "node": 2 },
      "best_cut": { "leaves": [0, 1, 2], "depth_class": 2 } },
    { "id": 5, "kind": "primary_output", "name": "o", "fanin0": { "node": 4 }, "required": 20.0 }
  ]
}"#;

    fn workspace(config: &str, network: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("conemap.toml");
        let network_path = dir.path().join("net.json");
        std::fs::write(&config_path, config).unwrap();
        std::fs::write(&network_path, network).unwrap();
        (dir, config_path, network_path)
    }

    fn global(config: PathBuf) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            color: false,
            config,
        }
    }

    fn args(network: PathBuf, format: ReportFormat) -> RequiredArgs {
        RequiredArgs {
            network,
            format,
            check: true,
        }
    }

    #[test]
    fn loads_valid_network() {
        let (_dir, _, network_path) = workspace("", NETWORK);
        let net = load_network(&network_path, 6).unwrap();
        assert_eq!(net.len(), 6);
        assert!(net.node(NodeId::from_raw(3)).fanin1.unwrap().complemented);
    }

    #[test]
    fn cut_larger_than_configured_is_rejected() {
        let (_dir, _, network_path) = workspace("", NETWORK);
        let err = load_network(&network_path, 2).unwrap_err();
        assert!(err.to_string().contains("expected 1..=2"));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let (_dir, _, network_path) = workspace("", "{ not json");
        let err = load_network(&network_path, 6).unwrap_err();
        assert!(err.to_string().contains("net.json"));
    }

    #[test]
    fn run_text_succeeds() {
        let (_dir, config, network) = workspace("[delay]\ntable = [0.0, 1.2, 2.0]\n", NETWORK);
        let code = run(&args(network, ReportFormat::Text), &global(config)).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn run_json_succeeds_with_output_override() {
        let toml = "[delay]\ntable = [0.0, 1.2, 2.0]\n[required]\noutput = 1.0\n";
        let (_dir, config, network) = workspace(toml, NETWORK);
        // Negative input required times are warnings, not errors.
        let code = run(&args(network, ReportFormat::Json), &global(config)).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn cone_overflow_is_an_error() {
        let toml = "[mapper]\ncone_capacity = 3\n[delay]\ntable = [0.0, 1.2, 2.0]\n";
        let (_dir, config, network) = workspace(toml, NETWORK);
        let code = run(&args(network.clone(), ReportFormat::Text), &global(config.clone())).unwrap();
        assert_eq!(code, 1);
        let code = run(&args(network, ReportFormat::Json), &global(config)).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn unknown_depth_class_is_an_error() {
        let (_dir, config, network) = workspace("[delay]\ntable = [0.0, 1.2]\n", NETWORK);
        let code = run(&args(network, ReportFormat::Text), &global(config)).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn missing_config_is_an_error() {
        let (dir, _, network) = workspace("", NETWORK);
        let missing = dir.path().join("absent.toml");
        assert!(run(&args(network, ReportFormat::Text), &global(missing)).is_err());
    }

    fn empty_report() -> RequiredReport {
        RequiredReport {
            visible: Default::default(),
            interior: Default::default(),
            unconstrained_nodes: 0,
            nodes: Vec::new(),
        }
    }

    #[test]
    fn json_includes_violations_only_when_checked() {
        let report = empty_report();
        let checked = render_json(Some(&report), &[], &[], true);
        assert!(checked["violations"].as_array().unwrap().is_empty());
        assert!(checked["diagnostics"].as_array().unwrap().is_empty());
        let unchecked = render_json(Some(&report), &[], &[], false);
        assert!(unchecked.get("violations").is_none());
        assert!(unchecked["diagnostics"].is_array());
        assert_eq!(unchecked["report"]["unconstrained_nodes"], 0);
    }

    #[test]
    fn json_carries_diagnostics() {
        let report = empty_report();
        let warning = Diagnostic::warning(NEGATIVE_INPUT_REQUIRED, "input a requires -0.500 ns")
            .at_node(0);
        let json = render_json(Some(&report), &[warning], &[], false);
        let diagnostics = json["diagnostics"].as_array().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0]["severity"], "Warning");
        assert_eq!(diagnostics[0]["node"], 0);
        assert_eq!(diagnostics[0]["message"], "input a requires -0.500 ns");
    }

    #[test]
    fn json_report_is_null_after_failure() {
        let err = RequiredTimeError::MissingBestCut {
            node: NodeId::from_raw(4),
        };
        let json = render_json(None, &[err.to_diagnostic()], &[], true);
        assert!(json["report"].is_null());
        assert_eq!(json["diagnostics"][0]["severity"], "Error");
        assert_eq!(json["diagnostics"][0]["node"], 4);
    }
}
