use lazy_static::lazy_static;
use vegascale_common::data::scalar::ScalarValue;

const SHAPES: &[&str] = &[
    "circle",
    "cross",
    "diamond",
    "square",
    "triangle-down",
    "triangle-up",
];

const CATEGORY10: &str = concat!(
    "1f77b4ff7f0e2ca02cd627289467bd",
    "8c564be377c27f7f7fbcbd2217becf"
);

const CATEGORY20: &str = concat!(
    "1f77b4aec7e8ff7f0effbb782ca02c98df8ad62728ff98969467bdc5b0d5",
    "8c564bc49c94e377c2f7b6d27f7f7fc7c7c7bcbd22dbdb8d17becf9edae5"
);

const CATEGORY20B: &str = concat!(
    "393b795254a36b6ecf9c9ede6379398ca252b5cf6bcedb9c8c6d31bd9e39",
    "e7ba52e7cb94843c39ad494ad6616be7969c7b4173a55194ce6dbdde9ed6"
);

const CATEGORY20C: &str = concat!(
    "3182bd6baed69ecae1c6dbefe6550dfd8d3cfdae6bfdd0a231a35474c476",
    "a1d99bc7e9c0756bb19e9ac8bcbddcdadaeb636363969696bdbdbdd9d9d9"
);

lazy_static! {
    static ref CATEGORY10_COLORS: Vec<String> = decode_scheme(CATEGORY10);
    static ref CATEGORY20_COLORS: Vec<String> = decode_scheme(CATEGORY20);
    static ref CATEGORY20B_COLORS: Vec<String> = decode_scheme(CATEGORY20B);
    static ref CATEGORY20C_COLORS: Vec<String> = decode_scheme(CATEGORY20C);
}

pub(crate) fn decode_scheme(hex: &str) -> Vec<String> {
    hex.as_bytes()
        .chunks_exact(6)
        .map(|chunk| {
            let color = std::str::from_utf8(chunk).unwrap_or_default();
            format!("#{color}")
        })
        .collect()
}

/// Values of a named range literal other than the layout dimensions
pub(crate) fn named_range(name: &str) -> Option<Vec<ScalarValue>> {
    let colors: &[String] = match name {
        "shapes" => return Some(SHAPES.iter().map(|s| ScalarValue::from(*s)).collect()),
        "category10" => &CATEGORY10_COLORS,
        "category20" => &CATEGORY20_COLORS,
        "category20b" => &CATEGORY20B_COLORS,
        "category20c" => &CATEGORY20C_COLORS,
        _ => return None,
    };
    Some(colors.iter().map(|c| ScalarValue::from(c.as_str())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes() {
        assert_eq!(named_range("shapes").unwrap().len(), 6);
        assert_eq!(named_range("category10").unwrap().len(), 10);
        for name in ["category20", "category20b", "category20c"] {
            assert_eq!(named_range(name).unwrap().len(), 20, "{name}");
        }
        assert!(named_range("width").is_none());
    }

    #[test]
    fn test_category10_colors() {
        let colors = named_range("category10").unwrap();
        assert_eq!(colors[0], ScalarValue::from("#1f77b4"));
        assert_eq!(colors[9], ScalarValue::from("#17becf"));
    }
}
