use super::*;

fn compile_args(argv: &[&str]) -> CompileArgs {
    let cli = Cli::try_parse_from(argv).unwrap();
    match cli.command {
        Command::Compile(args) => args,
        Command::Validate { .. } => panic!("expected compile"),
    }
}

#[test]
fn compile_flags_parse() {
    let args = compile_args(&[
        "adforge", "compile", "scene.json", "--size", "300x250", "--size", "728x90", "--loop", "3", "--fonts", "none",
    ]);
    assert_eq!(args.sizes, vec![Size::new(300, 250), Size::new(728, 90)]);
    assert_eq!(args.loop_count, 3);
    assert_eq!(args.fonts, FontsMode::None);
}

#[test]
fn negative_loop_is_accepted() {
    let args = compile_args(&["adforge", "compile", "scene.json", "--loop", "-1", "--fonts", "google"]);
    assert_eq!(LoopCount::from(args.loop_count), LoopCount::Infinite);
}

#[test]
fn out_conflicts_with_split() {
    let parsed = Cli::try_parse_from(["adforge", "compile", "s.json", "--out", "a.html", "--split", "dir"]);
    assert!(parsed.is_err());
}

#[test]
fn invalid_font_mode_is_rejected() {
    assert!(Cli::try_parse_from(["adforge", "compile", "s.json", "--fonts", "typekit"]).is_err());
}

// Only test that touches ADFORGE_*; the rest pass every env-backed flag.
#[test]
fn env_fills_missing_flags_and_flags_win() {
    unsafe {
        std::env::set_var("ADFORGE_LOOP", "7");
        std::env::set_var("ADFORGE_FONTS", "none");
    }
    let from_env = compile_args(&["adforge", "compile", "scene.json"]);
    let overridden = compile_args(&["adforge", "compile", "scene.json", "--loop", "0", "--fonts", "google"]);
    unsafe {
        std::env::remove_var("ADFORGE_LOOP");
        std::env::remove_var("ADFORGE_FONTS");
    }
    assert_eq!((from_env.loop_count, from_env.fonts), (7, FontsMode::None));
    assert_eq!((overridden.loop_count, overridden.fonts), (0, FontsMode::Google));

    let defaults = compile_args(&["adforge", "compile", "scene.json"]);
    assert_eq!((defaults.loop_count, defaults.fonts), (-1, FontsMode::Google));
}
