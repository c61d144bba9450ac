use super::*;

#[test]
fn test_full_config_parses() {
    let cfg: Config = toml::from_str(
        r#"
            search = "mcts"
            eval = "nnue"
            hash_mb = 64
            depth = 9
            weights = "nets/ferrite.frnn"
        "#,
    )
    .unwrap();
    assert_eq!(cfg.search, SearchBackend::Mcts);
    assert_eq!(cfg.eval, EvalStrategy::Nnue);
    assert_eq!(cfg.hash_mb, 64);
    assert_eq!(cfg.depth, 9);
    assert_eq!(cfg.weights, Some(PathBuf::from("nets/ferrite.frnn")));
}

#[test]
fn test_partial_config_keeps_defaults() {
    let cfg: Config = toml::from_str("eval = \"material\"").unwrap();
    assert_eq!(cfg.eval, EvalStrategy::Material);
    assert_eq!(cfg.search, SearchBackend::Alphabeta);
    assert_eq!(cfg.hash_mb, alphabeta_engine::DEFAULT_HASH_MB);
    assert!(cfg.weights.is_none());
}

#[test]
fn test_unknown_strategy_is_rejected() {
    assert!(toml::from_str::<Config>("eval = \"tablebase\"").is_err());
    assert!(toml::from_str::<Config>("search = \"minimax\"").is_err());
}

#[test]
fn test_option_values_parse_case_insensitively() {
    assert_eq!("MCTS".parse(), Ok(SearchBackend::Mcts));
    assert_eq!("Pst".parse(), Ok(EvalStrategy::Pst));
    assert!("minimax".parse::<SearchBackend>().is_err());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let cfg = Config::load_or_default(Path::new("/nonexistent/engine.toml")).unwrap();
    assert_eq!(cfg.search, SearchBackend::Alphabeta);
    assert_eq!(cfg.eval, EvalStrategy::Pst);
}

#[test]
fn test_malformed_file_is_an_error() {
    let path = std::env::temp_dir().join(format!("ferrite-config-{}.toml", std::process::id()));
    std::fs::write(&path, "search = [not toml").unwrap();
    assert!(Config::load_or_default(&path).is_err());
    std::fs::remove_file(&path).ok();
}
