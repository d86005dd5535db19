use super::*;

#[test]
fn fonts_modes() {
    assert_eq!("google".parse::<FontsMode>(), Ok(FontsMode::Google));
    assert_eq!(" NONE ".parse::<FontsMode>(), Ok(FontsMode::None));
    assert_eq!("off".parse::<FontsMode>(), Ok(FontsMode::None));
    assert_eq!("typekit".parse::<FontsMode>(), Err(ConfigError::InvalidFonts("typekit".into())));
}

#[test]
fn no_fonts_provider_never_links() {
    assert_eq!(FontsMode::None.provider().stylesheet_href(&["Roboto".to_owned()]), None);
    assert!(FontsMode::Google.provider().stylesheet_href(&["Roboto".to_owned()]).is_some());
}
