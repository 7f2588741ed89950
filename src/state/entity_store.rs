//! Generic CRUD + single-selection store for tokens and effects.
//!
//! Unknown ids are silently ignored: a stale id after a delete is a normal
//! interactive race, not an error.

use crate::models::entity::Entity;
use crate::models::geometry::Point;

use super::ids::IdGenerator;
use super::traits::Apply;

/// Commands accepted by [`EntityStore`].
#[derive(Debug, Clone)]
pub enum EntityCommand<T: Entity> {
    Add(T::Draft),
    Update { id: String, patch: T::Patch },
    Delete(String),
    Select(Option<String>),
    Move {
        id: String,
        x: f64,
        y: f64,
        grid_x: u32,
        grid_y: u32,
    },
    Resize { id: String, width: f64, height: f64 },
    SetOpacity { id: String, opacity: f64 },
    DeleteAll,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore<T: Entity> {
    items: Vec<T>,
    selected: Option<String>,
    ids: IdGenerator,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            ids: IdGenerator::new(T::ID_PREFIX),
        }
    }

    /// Reseeds the store from persisted data. Duplicate ids keep their first
    /// occurrence; a selection pointing nowhere is dropped.
    pub fn restore(items: Vec<T>, selected: Option<String>) -> Self {
        let mut store = Self::new();
        for item in items {
            if store.get(item.id()).is_some() {
                log::warn!("STORE: dropping duplicate {} id {}", T::ID_PREFIX, item.id());
                continue;
            }
            store.items.push(item);
        }
        store.ids.reserve(store.items.iter().map(|item| item.id()));
        let selected = selected.filter(|id| store.get(id).is_some());
        store.selected = selected;
        store
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Creates an entity, appends it and selects it.
    pub fn add(&mut self, draft: T::Draft) -> String {
        let items = &self.items;
        let id = self.ids.next_free(|id| items.iter().any(|item| item.id() == id));
        self.items.push(T::from_draft(id.clone(), draft));
        self.selected = Some(id.clone());
        log::debug!("STORE: added {}", id);
        id
    }

    pub fn update(&mut self, id: &str, patch: T::Patch) {
        if let Some(item) = self.get_mut(id) {
            item.apply_patch(patch);
        }
    }

    pub fn delete(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() != before {
            log::debug!("STORE: deleted {}", id);
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    pub fn select(&mut self, id: Option<&str>) {
        match id {
            None => self.selected = None,
            Some(id) => {
                if self.get(id).is_some() {
                    self.selected = Some(id.to_string());
                }
            }
        }
    }

    pub fn move_to(&mut self, id: &str, x: f64, y: f64, grid_x: u32, grid_y: u32) {
        if let Some(item) = self.get_mut(id) {
            item.move_to(x, y, grid_x, grid_y);
        }
    }

    pub fn resize(&mut self, id: &str, width: f64, height: f64) {
        if let Some(item) = self.get_mut(id) {
            item.resize(width, height);
        }
    }

    pub fn set_opacity(&mut self, id: &str, opacity: f64) {
        if let Some(item) = self.get_mut(id) {
            item.set_opacity(opacity);
        }
    }

    pub fn delete_all(&mut self) {
        self.items.clear();
        self.selected = None;
    }

    /// Topmost (last drawn) entity under the canvas point.
    pub fn hit_test(&self, point: Point) -> Option<&T> {
        self.items.iter().rev().find(|item| item.contains(point))
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }
}

impl<T: Entity> Apply<EntityCommand<T>> for EntityStore<T> {
    /// Id of the entity created by `Add`.
    type Outcome = Option<String>;

    fn apply(&mut self, command: EntityCommand<T>) -> Option<String> {
        match command {
            EntityCommand::Add(draft) => return Some(self.add(draft)),
            EntityCommand::Update { id, patch } => self.update(&id, patch),
            EntityCommand::Delete(id) => self.delete(&id),
            EntityCommand::Select(id) => self.select(id.as_deref()),
            EntityCommand::Move {
                id,
                x,
                y,
                grid_x,
                grid_y,
            } => self.move_to(&id, x, y, grid_x, grid_y),
            EntityCommand::Resize { id, width, height } => self.resize(&id, width, height),
            EntityCommand::SetOpacity { id, opacity } => self.set_opacity(&id, opacity),
            EntityCommand::DeleteAll => self.delete_all(),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::{
        Effect, EffectDraft, EffectType, MIN_ENTITY_SIZE, Token, TokenDraft, TokenPatch,
    };

    fn token_draft(x: f64) -> TokenDraft {
        TokenDraft::new("hero.png", x, 10.0)
    }

    #[test]
    fn add_then_delete_leaves_empty_store() {
        let mut tokens: EntityStore<Token> = EntityStore::new();
        let id = tokens.add(token_draft(1.0));
        assert_eq!(tokens.selected_id(), Some(id.as_str()));

        tokens.delete(&id);
        assert!(tokens.is_empty());
        assert_eq!(tokens.selected_id(), None);
    }

    #[test]
    fn deleting_unselected_keeps_selection() {
        let mut tokens: EntityStore<Token> = EntityStore::new();
        let first = tokens.add(token_draft(1.0));
        let second = tokens.add(token_draft(2.0));
        tokens.delete(&first);
        assert_eq!(tokens.selected_id(), Some(second.as_str()));
    }

    #[test]
    fn ids_are_unique() {
        let mut tokens: EntityStore<Token> = EntityStore::new();
        let a = tokens.add(token_draft(1.0));
        tokens.delete(&a);
        let b = tokens.add(token_draft(1.0));
        assert_ne!(a, b);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut effects: EntityStore<Effect> = EntityStore::new();
        let id = effects.add(EffectDraft::new(EffectType::Fire, 5.0, 5.0));
        let before = effects.clone();

        effects.delete("effect-999");
        effects.resize("nope", 100.0, 100.0);
        effects.set_opacity("nope", 0.1);
        effects.move_to("nope", 1.0, 1.0, 0, 0);
        effects.select(Some("nope"));
        assert_eq!(effects, before);
        assert_eq!(effects.selected_id(), Some(id.as_str()));
    }

    #[test]
    fn setters_clamp() {
        let mut tokens: EntityStore<Token> = EntityStore::new();
        let id = tokens.add(token_draft(1.0));
        tokens.resize(&id, 3.0, 400.0);
        tokens.set_opacity(&id, -0.5);
        let token = tokens.get(&id).unwrap();
        assert_eq!(token.width, MIN_ENTITY_SIZE);
        assert_eq!(token.height, 400.0);
        assert_eq!(token.opacity, 0.0);

        tokens.set_opacity(&id, 1.5);
        assert_eq!(tokens.get(&id).unwrap().opacity, 1.0);
    }

    #[test]
    fn reducer_matches_methods() {
        let store = EntityStore::<Token>::new()
            .reduce(EntityCommand::Add(token_draft(1.0)))
            .reduce(EntityCommand::Add(token_draft(2.0)))
            .reduce(EntityCommand::Update {
                id: "token-1".into(),
                patch: TokenPatch {
                    name: Some(Some("Scout".into())),
                    ..TokenPatch::default()
                },
            })
            .reduce(EntityCommand::Move {
                id: "token-2".into(),
                x: 150.0,
                y: 250.0,
                grid_x: 1,
                grid_y: 2,
            })
            .reduce(EntityCommand::Delete("token-2".into()));

        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.get("token-1").unwrap().name.as_deref(), Some("Scout"));
    }

    #[test]
    fn delete_all_clears_selection() {
        let mut effects: EntityStore<Effect> = EntityStore::new();
        effects.add(EffectDraft::new(EffectType::Smoke, 0.0, 0.0));
        effects.add(EffectDraft::new(EffectType::Holy, 0.0, 0.0));
        assert_eq!(effects.apply(EntityCommand::DeleteAll), None);
        assert!(effects.is_empty());
        assert_eq!(effects.selected_id(), None);
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut tokens: EntityStore<Token> = EntityStore::new();
        let below = tokens.add(token_draft(100.0));
        let above = tokens.add(token_draft(110.0));
        assert_eq!(tokens.hit_test(Point::new(105.0, 10.0)).unwrap().id, above);
        assert_eq!(tokens.hit_test(Point::new(80.0, 10.0)).unwrap().id, below);
        assert!(tokens.hit_test(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn restore_drops_dangling_selection_and_reserves_ids() {
        let mut source: EntityStore<Token> = EntityStore::new();
        source.add(token_draft(1.0));
        source.add(token_draft(2.0));

        let mut restored =
            EntityStore::restore(source.items().to_vec(), Some("token-77".to_string()));
        assert_eq!(restored.selected_id(), None);
        assert_eq!(restored.add(token_draft(3.0)), "token-3");
    }

    #[test]
    fn restored_max_suffix_does_not_break_add() {
        let mut source: EntityStore<Token> = EntityStore::new();
        source.add(token_draft(1.0));
        let mut items = source.items().to_vec();
        let mut huge = items[0].clone();
        huge.id = "token-18446744073709551615".to_string();
        items.push(huge);

        let mut restored = EntityStore::restore(items, None);
        assert_eq!(restored.add(token_draft(2.0)), "token-2");
        assert_eq!(restored.len(), 3);
    }
}
