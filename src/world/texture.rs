// Name → id interning for every texture a map references.
// Pixel data never enters the renderer; spans carry only the id.

use std::collections::HashMap;

/// Runtime handle for a texture name in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// The `-` sentinel: this surface has no texture.
pub const NO_TEXTURE: TextureId = 0;

/// The sky flat (`F_SKY1`), always interned second.
pub const SKY_TEXTURE: TextureId = 1;

const NO_TEXTURE_NAME: &str = "-";
const SKY_NAME: &str = "F_SKY1";

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// More distinct names than a `TextureId` can address.
    #[error("texture bank full ({0} names)")]
    Full(usize),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// Stores exactly one copy of every (upper-cased) name.
///
/// * ID **0** is always `-` (no texture).
/// * ID **1** is always the sky flat.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    names: Vec<String>,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureBank {
    pub fn new() -> Self {
        let names = vec![NO_TEXTURE_NAME.to_owned(), SKY_NAME.to_owned()];
        let by_name = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i as TextureId))
            .collect();
        Self { by_name, names }
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of names stored (including the two reserved ones).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing beyond the reserved names was interned.
    pub fn is_empty(&self) -> bool {
        self.names.len() == 2
    }

    /// Obtain the id for an interned name.  Returns `None` if unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(&canonical(name)).copied()
    }

    pub fn name(&self, id: TextureId) -> Result<&str, TextureError> {
        self.names
            .get(id as usize)
            .map(String::as_str)
            .ok_or(TextureError::BadId(id))
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Return the id of `name`, assigning the next free one on first sight.
    /// Empty names resolve to [`NO_TEXTURE`].
    pub fn intern(&mut self, name: &str) -> Result<TextureId, TextureError> {
        let name = canonical(name);
        if name.is_empty() {
            return Ok(NO_TEXTURE);
        }
        if let Some(&id) = self.by_name.get(&name) {
            return Ok(id);
        }
        let id = TextureId::try_from(self.names.len())
            .map_err(|_| TextureError::Full(self.names.len()))?;
        self.names.push(name.clone());
        self.by_name.insert(name, id);
        Ok(id)
    }
}

fn canonical(name: &str) -> String {
    name.trim_end_matches('\0').trim().to_ascii_uppercase()
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
