use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::shader::LightCounts;

/// Byte offset of the per-frame eye position at the head of the block.
pub const EYE_POS_OFFSET: u64 = 0;

const MATERIAL_OFFSET: u64 = 16;
const DIR_LIGHTS_OFFSET: u64 = 64;
const LIGHT_STRIDE: u64 = 64;

/// Resolved mapping from semantic field names to byte offsets inside the
/// lighting uniform block.
///
/// Mirrors the WGSL `Lighting` struct layout (uniform address space):
///
/// ```text
///   0  eyePos                      (vec3, one 16-byte slot)
///  16  material                    ambient@+0  shininess@+12  diffuse@+16  specular@+32
///  64  dirLights[N], stride 64     lightDir@+0 ambient@+16 diffuse@+32 specular@+48
///  64 + N*64  pointLights[M],      lightPos@+0 constant@+12 ambient@+16 linear@+28
///             stride 64            diffuse@+32 quadratic@+44 specular@+48
/// ```
///
/// The layout must be re-resolved if the program (and thus the counts) ever
/// changes; offsets from one layout are never valid against another.
#[derive(Debug, Clone)]
pub struct LightingLayout {
    counts: LightCounts,
    fields: HashMap<String, u64>,
}

impl LightingLayout {
    /// Resolves one offset per material field and per field of every array
    /// element of both light kinds.
    pub fn resolve(counts: LightCounts) -> Self {
        let mut fields = HashMap::new();

        fields.insert("material.ambient".to_string(), MATERIAL_OFFSET);
        fields.insert("material.shininess".to_string(), MATERIAL_OFFSET + 12);
        fields.insert("material.diffuse".to_string(), MATERIAL_OFFSET + 16);
        fields.insert("material.specular".to_string(), MATERIAL_OFFSET + 32);

        for i in 0..counts.dir {
            let base = DIR_LIGHTS_OFFSET + u64::from(i) * LIGHT_STRIDE;
            fields.insert(format!("dirLights[{i}].lightDir"), base);
            fields.insert(format!("dirLights[{i}].ambient"), base + 16);
            fields.insert(format!("dirLights[{i}].diffuse"), base + 32);
            fields.insert(format!("dirLights[{i}].specular"), base + 48);
        }

        let point_base = DIR_LIGHTS_OFFSET + u64::from(counts.dir) * LIGHT_STRIDE;
        for j in 0..counts.point {
            let base = point_base + u64::from(j) * LIGHT_STRIDE;
            fields.insert(format!("pointLights[{j}].lightPos"), base);
            fields.insert(format!("pointLights[{j}].constant"), base + 12);
            fields.insert(format!("pointLights[{j}].ambient"), base + 16);
            fields.insert(format!("pointLights[{j}].linear"), base + 28);
            fields.insert(format!("pointLights[{j}].diffuse"), base + 32);
            fields.insert(format!("pointLights[{j}].quadratic"), base + 44);
            fields.insert(format!("pointLights[{j}].specular"), base + 48);
        }

        Self { counts, fields }
    }

    /// Looks up a resolved field. Unknown names error out so a host/shader
    /// mismatch shows up at setup instead of as wrong pixels.
    pub fn offset_of(&self, name: &str) -> Result<u64> {
        self.fields
            .get(name)
            .copied()
            .with_context(|| format!("uniform field '{name}' not found in lighting block"))
    }

    /// Number of resolved fields: 4 material + 4 per dir light + 7 per
    /// point light.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn counts(&self) -> LightCounts {
        self.counts
    }

    /// Total block size in bytes.
    pub fn buffer_size(&self) -> u64 {
        DIR_LIGHTS_OFFSET + u64::from(self.counts.dir + self.counts.point) * LIGHT_STRIDE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_count_for_one_of_each() {
        let layout = LightingLayout::resolve(LightCounts::ONE);
        assert_eq!(layout.field_count(), 4 + 4 + 7);
    }

    #[test]
    fn field_count_scales_with_counts() {
        let layout = LightingLayout::resolve(LightCounts::new(2, 100));
        assert_eq!(layout.field_count(), 4 + 2 * 4 + 100 * 7);
    }

    #[test]
    fn material_offsets() {
        let layout = LightingLayout::resolve(LightCounts::ONE);
        assert_eq!(layout.offset_of("material.ambient").unwrap(), 16);
        assert_eq!(layout.offset_of("material.shininess").unwrap(), 28);
        assert_eq!(layout.offset_of("material.diffuse").unwrap(), 32);
        assert_eq!(layout.offset_of("material.specular").unwrap(), 48);
    }

    #[test]
    fn dir_light_array_is_contiguous_from_64() {
        let layout = LightingLayout::resolve(LightCounts::new(3, 1));
        assert_eq!(layout.offset_of("dirLights[0].lightDir").unwrap(), 64);
        assert_eq!(layout.offset_of("dirLights[1].lightDir").unwrap(), 128);
        assert_eq!(layout.offset_of("dirLights[2].specular").unwrap(), 192 + 48);
    }

    #[test]
    fn point_lights_start_after_dir_lights() {
        let layout = LightingLayout::resolve(LightCounts::new(2, 2));
        assert_eq!(layout.offset_of("pointLights[0].lightPos").unwrap(), 64 + 128);
        assert_eq!(layout.offset_of("pointLights[1].quadratic").unwrap(), 64 + 128 + 64 + 44);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let layout = LightingLayout::resolve(LightCounts::ONE);
        assert!(layout.offset_of("dirLights[1].ambient").is_err());
        assert!(layout.offset_of("material.glow").is_err());
    }

    #[test]
    fn buffer_size_covers_all_fields() {
        let layout = LightingLayout::resolve(LightCounts::new(2, 100));
        assert_eq!(layout.buffer_size(), 64 + 102 * 64);
        // Every resolved field lies inside the buffer (vec3 fields span 12 bytes).
        for (_, &off) in layout.fields.iter() {
            assert!(off + 12 <= layout.buffer_size());
        }
    }
}
