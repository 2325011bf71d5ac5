//! Platform style registration: the interning store behind [`StyleRef`].
//!
//! This is the crate's stand-in for the host platform's "create a style
//! object" primitive. Registering a sheet replaces each rule block with an
//! opaque [`StyleRef`]; registration is idempotent per distinct block shape,
//! so equal blocks always intern to the same reference.
//!
//! The store is `thread_local!`: the whole engine runs inline inside a
//! single-threaded host update cycle, so no locking is involved. A
//! multi-threaded port would need to replace this store with a shared,
//! guarded one.

use std::cell::RefCell;
use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::error::ConfigError;
use crate::style::value::{StyleMap, StyleValue};

new_key_type! {
    /// Opaque reference to a registered style block. Copy, lightweight (u64).
    pub struct StyleRef;
}

// ---------------------------------------------------------------------------
// Store internals
// ---------------------------------------------------------------------------

struct StyleStore {
    blocks: SlotMap<StyleRef, StyleMap>,
    /// Structural interning: block shape → existing reference.
    interned: HashMap<StyleMap, StyleRef>,
}

impl StyleStore {
    fn new() -> Self {
        Self {
            blocks: SlotMap::with_key(),
            interned: HashMap::new(),
        }
    }

    fn register(&mut self, rule: &StyleMap) -> StyleRef {
        if let Some(&existing) = self.interned.get(rule) {
            return existing;
        }
        let id = self.blocks.insert(rule.clone());
        self.interned.insert(rule.clone(), id);
        id
    }
}

thread_local! {
    static STORE: RefCell<StyleStore> = RefCell::new(StyleStore::new());
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Register every block of a style sheet, returning block name → reference.
///
/// Blocks that are already references are kept as-is, mirroring re-creation
/// of a partially registered sheet.
///
/// # Errors
///
/// Fails fast if a block still contains deferred theme variables (resolution
/// must happen first) or is not a rule map at all.
pub fn create(sheet: &StyleMap) -> Result<StyleMap, ConfigError> {
    let mut registered = StyleMap::new();
    for (name, value) in sheet {
        match value {
            StyleValue::Ref(id) => {
                registered.insert(name.clone(), StyleValue::Ref(*id));
            }
            StyleValue::Map(rule) => {
                ensure_resolved(name, rule)?;
                let id = STORE.with(|store| store.borrow_mut().register(rule));
                registered.insert(name.clone(), StyleValue::Ref(id));
            }
            StyleValue::Var(_) => {
                return Err(ConfigError::UnresolvedVariable {
                    block: name.clone(),
                })
            }
            other => {
                return Err(ConfigError::InvalidBlock {
                    block: name.clone(),
                    context: "style registration",
                    found: other.shape(),
                })
            }
        }
    }
    Ok(registered)
}

/// Register a single rule block, returning its reference.
///
/// # Errors
///
/// Fails fast if the rule still contains deferred theme variables.
pub fn register(rule: &StyleMap) -> Result<StyleRef, ConfigError> {
    ensure_resolved("<rule>", rule)?;
    Ok(STORE.with(|store| store.borrow_mut().register(rule)))
}

/// Look a registered block back up. `None` for references from another
/// thread's store or never-registered keys.
pub fn lookup(id: StyleRef) -> Option<StyleMap> {
    STORE.with(|store| store.borrow().blocks.get(id).cloned())
}

/// Extend a registered sheet with ad hoc overrides and re-register.
///
/// Each referenced block is looked back up, the override sheet is
/// deep-merged over the result (last write wins, recursing into nested
/// maps), and the merged sheet is registered anew. Override blocks with no
/// counterpart in `sheet` are added.
///
/// # Errors
///
/// Fails if `sheet` holds a dangling reference, or if the merged result
/// cannot be registered.
pub fn extend_stylesheet(sheet: &StyleMap, overrides: &StyleMap) -> Result<StyleMap, ConfigError> {
    let mut merged = StyleMap::new();
    for (name, value) in sheet {
        let flattened = match value {
            StyleValue::Ref(id) => lookup(*id).ok_or_else(|| ConfigError::UnknownReference {
                block: name.clone(),
            })?,
            StyleValue::Map(rule) => rule.clone(),
            other => {
                return Err(ConfigError::InvalidBlock {
                    block: name.clone(),
                    context: "stylesheet extension",
                    found: other.shape(),
                })
            }
        };
        merged.insert(name.clone(), StyleValue::Map(flattened));
    }

    deep_merge(&mut merged, overrides);
    create(&merged)
}

fn ensure_resolved(block: &str, rule: &StyleMap) -> Result<(), ConfigError> {
    for value in rule.values() {
        match value {
            StyleValue::Var(_) => {
                return Err(ConfigError::UnresolvedVariable {
                    block: block.to_owned(),
                })
            }
            StyleValue::Map(nested) => ensure_resolved(block, nested)?,
            _ => {}
        }
    }
    Ok(())
}

/// Last-write-wins deep merge: `overrides` values replace `base` values,
/// except both-map collisions, which merge recursively.
fn deep_merge(base: &mut StyleMap, overrides: &StyleMap) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(StyleValue::Map(existing)), StyleValue::Map(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
