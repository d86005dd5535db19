use super::*;

fn families(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn google_link_is_sorted_and_deduplicated() {
    let href = GoogleFonts.stylesheet_href(&families(&["Roboto", "Open Sans, sans-serif", "Roboto"]));
    assert_eq!(
        href.as_deref(),
        Some("https://fonts.googleapis.com/css2?family=Open+Sans&family=Roboto&display=swap")
    );
}

#[test]
fn local_families_need_no_link() {
    assert_eq!(GoogleFonts.stylesheet_href(&families(&["Arial", "Helvetica Neue", "serif"])), None);
    assert_eq!(GoogleFonts.stylesheet_href(&[]), None);
}

#[test]
fn quoted_names_are_unquoted() {
    assert_eq!(split_font_stack("'Playfair Display', \"Lato\" , serif"), families(&["Playfair Display", "Lato", "serif"]));
}

#[test]
fn names_with_url_syntax_are_skipped() {
    let href = GoogleFonts.stylesheet_href(&families(&["Lato&x=1", "Inter"]));
    assert_eq!(href.as_deref(), Some("https://fonts.googleapis.com/css2?family=Inter&display=swap"));
}

#[test]
fn no_fonts_never_links() {
    assert_eq!(NoFonts.stylesheet_href(&families(&["Roboto"])), None);
}
