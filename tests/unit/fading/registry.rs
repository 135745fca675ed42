use super::*;

#[test]
fn registered_curve_wins() {
    let mut table = [0u8; 256];
    table[10] = 99;
    let mut reg = CurveList::new().with_curve("Linear", table);
    let c = resolve_fading_curve(&mut reg, "Linear");
    assert_eq!(c.apply(10), 99);
    assert_eq!(c.name(), Some("Linear"));
}

#[test]
fn generator_kind_is_instantiated_without_registering() {
    let mut reg = CurveList::new();
    let c = resolve_fading_curve(&mut reg, "InvertedLinear");
    assert_eq!(c.apply(0), 255);
    assert!(reg.is_empty());
}

#[test]
fn unknown_name_registers_linear_curve() {
    let mut reg = CurveList::new();
    let c = resolve_fading_curve(&mut reg, "MyStripCurve");
    assert_eq!(c.apply(42), 42);
    assert_eq!(c.name(), Some("MyStripCurve"));
    assert!(reg.contains("MyStripCurve"));

    let again = resolve_fading_curve(&mut reg, "MyStripCurve");
    assert_eq!(again, c);
    assert_eq!(reg.len(), 1);
}

#[test]
fn blank_name_uses_anonymous_linear() {
    let mut reg = CurveList::new();
    for name in ["", "   "] {
        let c = resolve_fading_curve(&mut reg, name);
        assert_eq!(c, FadingCurve::linear());
    }
    assert!(reg.is_empty());
}
