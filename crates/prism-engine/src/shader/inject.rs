use anyhow::Result;

/// Default array-size directive for directional lights as it appears
/// literally in fragment source.
pub const DIR_COUNT_TOKEN: &str = "NR_DIR_LIGHTS: u32 = 1u";

/// Default array-size directive for point lights.
pub const POINT_COUNT_TOKEN: &str = "NR_POINT_LIGHTS: u32 = 1u";

/// Light-array sizes shared between shader-source injection and uniform
/// layout resolution.
///
/// A single value is threaded to both consumers, so the count compiled into
/// the fragment stage always equals the count the binder resolves against.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LightCounts {
    pub dir: u32,
    pub point: u32,
}

impl LightCounts {
    pub const ONE: Self = Self { dir: 1, point: 1 };

    pub fn new(dir: u32, point: u32) -> Self {
        Self { dir, point }
    }
}

/// Rewrites the light-count directives in `src` to `counts`.
///
/// This is a textual contract: the source must contain the default
/// directives exactly once each. A missing token is a setup-fatal error
/// rather than a silently unmodified shader.
pub fn inject_light_counts(src: &str, counts: LightCounts) -> Result<String> {
    anyhow::ensure!(
        src.contains(DIR_COUNT_TOKEN),
        "fragment source is missing the '{DIR_COUNT_TOKEN}' directive"
    );
    anyhow::ensure!(
        src.contains(POINT_COUNT_TOKEN),
        "fragment source is missing the '{POINT_COUNT_TOKEN}' directive"
    );
    anyhow::ensure!(counts.dir > 0 && counts.point > 0, "light counts must be non-zero");

    let out = src
        .replacen(
            DIR_COUNT_TOKEN,
            &format!("NR_DIR_LIGHTS: u32 = {}u", counts.dir),
            1,
        )
        .replacen(
            POINT_COUNT_TOKEN,
            &format!("NR_POINT_LIGHTS: u32 = {}u", counts.point),
            1,
        );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "const NR_DIR_LIGHTS: u32 = 1u;\n\
                       const NR_POINT_LIGHTS: u32 = 1u;\n\
                       fn unrelated() -> u32 { return 1u; }\n";

    #[test]
    fn substitutes_both_counts() {
        let out = inject_light_counts(SRC, LightCounts::new(2, 100)).unwrap();
        assert!(out.contains("const NR_DIR_LIGHTS: u32 = 2u;"));
        assert!(out.contains("const NR_POINT_LIGHTS: u32 = 100u;"));
    }

    #[test]
    fn leaves_unrelated_literals_alone() {
        let out = inject_light_counts(SRC, LightCounts::new(2, 100)).unwrap();
        assert!(out.contains("fn unrelated() -> u32 { return 1u; }"));
    }

    #[test]
    fn identity_when_counts_are_one() {
        let out = inject_light_counts(SRC, LightCounts::ONE).unwrap();
        assert_eq!(out, SRC);
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = inject_light_counts("fn main() {}", LightCounts::ONE);
        assert!(err.is_err());
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(inject_light_counts(SRC, LightCounts::new(0, 1)).is_err());
    }

    #[test]
    fn shipped_fragment_sources_carry_the_tokens() {
        let forward = include_str!("../render/shaders/lighting.inc.wgsl");
        assert!(forward.contains(DIR_COUNT_TOKEN));
        assert!(forward.contains(POINT_COUNT_TOKEN));
    }
}
