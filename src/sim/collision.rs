//! Player collision resolution
//!
//! Pickups are always collected on contact. Obstacle hits are ignored while
//! the player is immune or a portal is in progress; otherwise a shield soaks
//! the hit, and without one the player loses a life.

use super::obstacles::{Obstacle, ObstacleField};
use super::pickups::{PickupKind, PowerUpField};
use super::player::Player;
use super::state::GameEvent;
use super::geometry::circle_overlaps_rect;
use crate::tuning::Tuning;

/// Most significant thing that happened this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Contact {
    None,
    PickupCollected,
    Hit,
    GameOver,
}

/// Circle vs the obstacle's deflated box
#[inline]
pub fn touches_obstacle(player: &Player, obstacle: &Obstacle, inset: f32) -> bool {
    circle_overlaps_rect(player.pos, player.radius, &obstacle.hitbox(inset))
}

/// Apply a collected pickup to the player
pub fn apply_pickup(player: &mut Player, kind: PickupKind, tuning: &Tuning) {
    match kind {
        PickupKind::Shield => {
            player.shield_active = true;
            player.shield_timer = tuning.shield_frames;
        }
        PickupKind::Life => {
            player.lives = (player.lives + 1).min(tuning.max_lives);
        }
    }
}

/// Apply a qualifying obstacle hit; returns true if it was fatal
pub fn apply_hit(player: &mut Player, tuning: &Tuning) -> bool {
    if player.shield_active {
        player.shield_active = false;
        player.shield_timer = 0.0;
        player.immunity_timer = tuning.shield_immunity_frames;
        return false;
    }
    player.lives = player.lives.saturating_sub(1);
    player.immunity_timer = tuning.hit_immunity_frames;
    player.hit_freeze_timer = tuning.hit_freeze_frames;
    player.lives == 0
}

/// Resolve all player contacts for one frame
///
/// Events are appended to `events`; the caller decides when they are
/// delivered.
pub fn resolve(
    player: &mut Player,
    obstacles: &ObstacleField,
    pickups: &mut PowerUpField,
    portal_busy: bool,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Contact {
    let mut contact = Contact::None;

    for kind in pickups.take_overlapping(player.pos, player.radius) {
        apply_pickup(player, kind, tuning);
        events.push(GameEvent::Pickup(kind));
        contact = Contact::PickupCollected;
    }

    if player.is_immune() || portal_busy {
        return contact;
    }

    let hit = obstacles
        .obstacles()
        .iter()
        .any(|ob| touches_obstacle(player, ob, tuning.hitbox_inset));
    if !hit {
        return contact;
    }

    let absorbed = player.shield_active;
    let fatal = apply_hit(player, tuning);
    events.push(GameEvent::Hit { absorbed });
    if fatal { Contact::GameOver } else { Contact::Hit }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pickups::Pickup;
    use glam::Vec2;

    fn setup() -> (Tuning, Player, ObstacleField, PowerUpField) {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.pos = Vec2::new(512.0, 384.0);
        (tuning, player, ObstacleField::default(), PowerUpField::new())
    }

    fn overlapping(field: &mut ObstacleField, player: &Player, tuning: &Tuning) {
        field.insert(Obstacle::new(player.pos - Vec2::splat(20.0), 40), tuning);
    }

    #[test]
    fn test_hit_costs_a_life() {
        let (tuning, mut player, mut field, mut pickups) = setup();
        overlapping(&mut field, &player, &tuning);
        let mut events = Vec::new();

        let contact = resolve(&mut player, &field, &mut pickups, false, &tuning, &mut events);
        assert_eq!(contact, Contact::Hit);
        assert_eq!(player.lives, 2);
        assert!(player.immunity_timer > 0.0);
        assert!(player.hit_freeze_timer > 0.0);
        assert_eq!(events, vec![GameEvent::Hit { absorbed: false }]);
    }

    #[test]
    fn test_shield_absorbs() {
        let (tuning, mut player, mut field, mut pickups) = setup();
        overlapping(&mut field, &player, &tuning);
        player.shield_active = true;
        player.shield_timer = 100.0;
        let mut events = Vec::new();

        let contact = resolve(&mut player, &field, &mut pickups, false, &tuning, &mut events);
        assert_eq!(contact, Contact::Hit);
        assert_eq!(player.lives, tuning.start_lives);
        assert!(!player.shield_active);
        assert_eq!(player.shield_timer, 0.0);
        assert_eq!(player.immunity_timer, tuning.shield_immunity_frames);
        assert_eq!(events, vec![GameEvent::Hit { absorbed: true }]);
    }

    #[test]
    fn test_immunity_and_portal_skip_hits() {
        let (tuning, mut player, mut field, mut pickups) = setup();
        overlapping(&mut field, &player, &tuning);
        let mut events = Vec::new();

        player.immunity_timer = 10.0;
        assert_eq!(resolve(&mut player, &field, &mut pickups, false, &tuning, &mut events), Contact::None);
        player.immunity_timer = 0.0;
        assert_eq!(resolve(&mut player, &field, &mut pickups, true, &tuning, &mut events), Contact::None);
        assert_eq!(player.lives, tuning.start_lives);
        assert!(events.is_empty());
    }

    #[test]
    fn test_last_life_is_game_over() {
        let (tuning, mut player, mut field, mut pickups) = setup();
        overlapping(&mut field, &player, &tuning);
        player.lives = 1;
        let mut events = Vec::new();
        let contact = resolve(&mut player, &field, &mut pickups, false, &tuning, &mut events);
        assert_eq!(contact, Contact::GameOver);
        assert_eq!(player.lives, 0);
    }

    #[test]
    fn test_hitbox_is_forgiving() {
        let (tuning, mut player, mut field, mut pickups) = setup();
        // Sprite edge 3 units inside the player's circle, but the hitbox is inset by 6
        field.insert(Obstacle::new(Vec2::new(player.pos.x + 17.0, player.pos.y - 20.0), 40), &tuning);
        let mut events = Vec::new();
        assert_eq!(resolve(&mut player, &field, &mut pickups, false, &tuning, &mut events), Contact::None);
    }

    #[test]
    fn test_pickups_ignore_immunity() {
        let (tuning, mut player, field, mut pickups) = setup();
        player.immunity_timer = 50.0;
        player.lives = tuning.max_lives;
        pickups.push(Pickup {
            pos: player.pos - Vec2::splat(10.0),
            size: 40.0,
            kind: PickupKind::Life,
        });
        pickups.push(Pickup {
            pos: player.pos,
            size: 40.0,
            kind: PickupKind::Shield,
        });
        let mut events = Vec::new();
        let contact = resolve(&mut player, &field, &mut pickups, true, &tuning, &mut events);
        assert_eq!(contact, Contact::PickupCollected);
        assert!(pickups.is_empty());
        // Capped
        assert_eq!(player.lives, tuning.max_lives);
        assert!(player.shield_active);
        assert_eq!(player.shield_timer, tuning.shield_frames);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_shield_pickup_replaces_timer() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.shield_active = true;
        player.shield_timer = 12.0;
        apply_pickup(&mut player, PickupKind::Shield, &tuning);
        assert_eq!(player.shield_timer, tuning.shield_frames);
    }
}
