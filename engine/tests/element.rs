use skirmish::Element;

#[test]
fn only_three_pairings_are_not_neutral() {
    let table = Element::ALL
        .iter()
        .flat_map(|&a| Element::ALL.iter().map(move |&d| (a, d)))
        .filter(|&(a, d)| a.modifier_pct(d) != 100)
        .map(|(a, d)| format!("{a}->{d}={}", a.modifier_pct(d)))
        .collect::<Vec<_>>()
        .join(" ");
    insta::assert_snapshot!(table, @"fire->water=50 fire->earth=150 water->fire=150");
}

#[test]
fn table_is_not_symmetric() {
    assert_eq!(Element::Earth.modifier(Element::Fire), 1.0);
    assert_eq!(Element::Water.modifier(Element::Fire), 1.5);
    assert_eq!(Element::Fire.modifier(Element::Water), 0.5);
}

#[test]
fn unknown_element_names_read_as_neutral() {
    let el: Element = serde_json::from_str("\"plasma\"").unwrap();
    assert_eq!(el, Element::Neutral);
    let el: Element = serde_json::from_str("\"fire\"").unwrap();
    assert_eq!(el, Element::Fire);
}
