//! Saved pinned order and hidden set.
//!
//! Each identity is stored as URL-safe unpadded base64 of its UTF-8 bytes and
//! the tokens are joined with `,`. Tokens that do not decode cleanly are kept
//! verbatim as identities written by older shells.

use crate::entry::EntryId;
use crate::store::{KeyValueStore, StoreError};
use crate::zones::HiddenSet;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use log::debug;

pub const GROUP: &str = "sidebar";
pub const PINNED_ORDER_KEY: &str = "pinnedOrder";
pub const HIDDEN_BUTTONS_KEY: &str = "hiddenButtons";

/// Read while the primary keys are absent and removed by the first save.
/// Values are never written to them.
pub const LEGACY_GROUP: &str = "runelite";
pub const LEGACY_PINNED_KEY: &str = "clientSidebarPinned";
pub const LEGACY_HIDDEN_KEY: &str = "clientSidebarHidden";

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode_token(id: &str) -> String {
    TOKEN_ENGINE.encode(id.as_bytes())
}

pub fn decode_token(token: &str) -> String {
    let Ok(bytes) = TOKEN_ENGINE.decode(token) else {
        return token.to_string();
    };
    match String::from_utf8(bytes) {
        // Plain labels can happen to be valid base64; only accept canonical tokens.
        Ok(decoded) if encode_token(&decoded) == token.trim_end_matches('=') => decoded,
        _ => token.to_string(),
    }
}

pub fn encode_list<'a>(ids: impl IntoIterator<Item = &'a EntryId>) -> String {
    ids.into_iter()
        .map(|id| encode_token(id.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn decode_list(raw: &str) -> Vec<EntryId> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| EntryId::new(decode_token(token)))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub pinned_order: Vec<EntryId>,
    pub hidden: HiddenSet,
}

impl PersistedState {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let pinned_raw = read_with_legacy(store, PINNED_ORDER_KEY, LEGACY_PINNED_KEY);
        let hidden_raw = read_with_legacy(store, HIDDEN_BUTTONS_KEY, LEGACY_HIDDEN_KEY);
        debug!("load_state: pinned={pinned_raw:?} hidden={hidden_raw:?}");

        let mut pinned_order = Vec::new();
        for id in pinned_raw.as_deref().map(decode_list).unwrap_or_default() {
            if !pinned_order.contains(&id) {
                pinned_order.push(id);
            }
        }
        let hidden = hidden_raw
            .as_deref()
            .map(decode_list)
            .unwrap_or_default()
            .into_iter()
            .collect();

        Self {
            pinned_order,
            hidden,
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let pinned = encode_list(&self.pinned_order);
        let hidden = encode_list(&self.hidden);
        debug!("save_state: pinned={pinned:?} hidden={hidden:?}");
        write_or_unset(store, PINNED_ORDER_KEY, &pinned)?;
        write_or_unset(store, HIDDEN_BUTTONS_KEY, &hidden)?;
        // Legacy values have been carried over by now. Dropping them keeps an
        // emptied list from reading them back.
        store.unset(LEGACY_GROUP, LEGACY_PINNED_KEY)?;
        store.unset(LEGACY_GROUP, LEGACY_HIDDEN_KEY)
    }

    /// Forgets everything, including legacy keys.
    pub fn reset(store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.unset(GROUP, PINNED_ORDER_KEY)?;
        store.unset(GROUP, HIDDEN_BUTTONS_KEY)?;
        store.unset(LEGACY_GROUP, LEGACY_PINNED_KEY)?;
        store.unset(LEGACY_GROUP, LEGACY_HIDDEN_KEY)
    }
}

fn read_with_legacy(store: &dyn KeyValueStore, key: &str, legacy_key: &str) -> Option<String> {
    store
        .get(GROUP, key)
        .or_else(|| store.get(LEGACY_GROUP, legacy_key))
        .filter(|value| !value.is_empty())
}

fn write_or_unset(store: &mut dyn KeyValueStore, key: &str, value: &str) -> Result<(), StoreError> {
    if value.is_empty() {
        store.unset(GROUP, key)
    } else {
        store.set(GROUP, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::ids;

    #[test]
    fn tokens_survive_delimiters_and_non_ascii() {
        for id in ["Notes", "a,b", "Ünïcödé ✓", "x=y/z+w", ""] {
            let token = encode_token(id);
            assert!(!token.contains(','));
            assert_eq!(decode_token(&token), id);
        }
    }

    #[test]
    fn undecodable_tokens_are_kept_as_legacy_identities() {
        assert_eq!(decode_token("Hiscores"), "Hiscores");
        assert_eq!(decode_token("Info"), "Info");
        assert_eq!(decode_token("World Map"), "World Map");
    }

    #[test]
    fn labels_that_look_like_tokens() {
        // Stray trailing bits are never produced by the encoder.
        assert_eq!(decode_token("Map"), "Map");
        assert_eq!(decode_token("Skills"), "Skills");
        // A canonical token wins even if an older shell meant it as a label.
        assert_eq!(decode_token("Wiki"), "Z)\"");
        assert_eq!(encode_token("Z)\""), "Wiki");
    }

    #[test]
    fn padded_tokens_still_decode() {
        assert_eq!(decode_token("QQ=="), "A");
    }

    #[test]
    fn pinned_order_round_trips_through_store() {
        let mut store = MemoryStore::new();
        let state = PersistedState {
            pinned_order: ids(&["B", "a,b", "Ω"]),
            hidden: ids(&["C", "A"]).into_iter().collect(),
        };
        state.save(&mut store).unwrap();

        let raw = store.get(GROUP, PINNED_ORDER_KEY).unwrap();
        assert_eq!(raw.split(',').count(), 3);
        let loaded = PersistedState::load(&store);
        assert_eq!(loaded, state);
        assert_eq!(loaded.hidden.iter().next(), Some(&EntryId::from("C")));
    }

    #[test]
    fn empty_lists_unset_their_keys() {
        let mut store = MemoryStore::new();
        store.set(GROUP, PINNED_ORDER_KEY, "QQ").unwrap();
        store.set(GROUP, HIDDEN_BUTTONS_KEY, "Qg").unwrap();
        PersistedState::default().save(&mut store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_input_is_skipped_not_fatal() {
        let mut store = MemoryStore::new();
        store
            .set(GROUP, PINNED_ORDER_KEY, ",,QQ, ,QQ,Qg,")
            .unwrap();
        let loaded = PersistedState::load(&store);
        assert_eq!(loaded.pinned_order, ids(&["A", "B"]));
    }

    #[test]
    fn legacy_keys_are_read_when_primary_absent() {
        let mut store = MemoryStore::new();
        store
            .set("runelite", "clientSidebarPinned", "Hiscores,Notes")
            .unwrap();
        store.set("runelite", "clientSidebarHidden", "Info").unwrap();

        let loaded = PersistedState::load(&store);
        assert_eq!(loaded.pinned_order, ids(&["Hiscores", "Notes"]));
        assert!(loaded.hidden.contains(&EntryId::from("Info")));

        loaded.save(&mut store).unwrap();
        assert!(store.get(LEGACY_GROUP, LEGACY_PINNED_KEY).is_none());
        assert!(store.get(LEGACY_GROUP, LEGACY_HIDDEN_KEY).is_none());
        assert_eq!(PersistedState::load(&store), loaded);
    }

    #[test]
    fn emptied_lists_do_not_bring_legacy_data_back() {
        let mut store = MemoryStore::new();
        store.set(LEGACY_GROUP, LEGACY_PINNED_KEY, "Notes").unwrap();
        let mut state = PersistedState::load(&store);
        assert_eq!(state.pinned_order, ids(&["Notes"]));

        state.pinned_order.clear();
        state.save(&mut store).unwrap();
        assert!(PersistedState::load(&store).pinned_order.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn reset_clears_primary_and_legacy_keys() {
        let mut store = MemoryStore::new();
        store.set(GROUP, PINNED_ORDER_KEY, "QQ").unwrap();
        store.set(LEGACY_GROUP, LEGACY_HIDDEN_KEY, "Info").unwrap();
        PersistedState::reset(&mut store).unwrap();
        assert!(store.is_empty());
    }
}
