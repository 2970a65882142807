//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

use lean_advisor::cli::{Cli, Commands};
use lean_advisor::domain::models::ArtifactKind;

#[test]
fn test_templates_command() {
    let cli = Cli::try_parse_from([
        "lean-advisor",
        "templates",
        "--project",
        "p1",
        "--user",
        "u1",
        "--kind",
        "pivot-option",
        "--context",
        r#"{"audience":"agencies"}"#,
        "--json",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Templates(args) => {
            assert_eq!(args.kind, ArtifactKind::PivotOption);
            assert_eq!(args.context.unwrap()["audience"], "agencies");
            assert!(args.stage.is_none());
            assert!(!args.offline);
        }
        _ => panic!("expected templates command"),
    }
}

#[test]
fn test_unknown_kind_rejected() {
    let result = Cli::try_parse_from([
        "lean-advisor", "templates", "--project", "p1", "--user", "u1", "--kind", "persona",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_global_config_and_serve_overrides() {
    let cli = Cli::try_parse_from([
        "lean-advisor",
        "--config",
        "deploy/advisor.yaml",
        "serve",
        "--port",
        "9000",
        "--offline",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("deploy/advisor.yaml")));
    match cli.command {
        Commands::Serve(args) => {
            assert_eq!(args.port, Some(9000));
            assert!(args.host.is_none());
            assert!(args.offline);
        }
        _ => panic!("expected serve command"),
    }
}

#[test]
fn test_insights_requires_identity() {
    assert!(Cli::try_parse_from(["lean-advisor", "insights", "--project", "p1"]).is_err());
    let cli = Cli::try_parse_from([
        "lean-advisor", "insights", "--project", "p1", "--user", "u1", "--experiment", "e3",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::Insights(ref args) if args.experiment.as_deref() == Some("e3")));
}
