/// Unit shown under a sensor value: the part before the first `/`.
///
/// Tooltips show the full unit instead.
pub fn format_unit(unit: &str) -> &str {
    unit.split_once('/').map_or(unit, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_unit() {
        assert_eq!(format_unit("μmol/s⋅m²"), "μmol");
        assert_eq!(format_unit("mS/cm"), "mS");
        assert_eq!(format_unit("%"), "%");
        assert_eq!(format_unit(""), "");
        assert_eq!(format_unit("a/b/c"), "a");
    }
}
