//! Fixed-step simulation tick
//!
//! Advances the world by one frame. Step order matters for collision
//! fairness: player, enemies, bullets, power-ups, particles.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, confine, heading};
use super::input::TickInput;
use super::state::{
    Bullet, GameEvent, GamePhase, GameWorld, ParticleTint, PowerUp, PowerUpKind, spawn_burst,
};
use crate::consts::*;

/// Advance the game world by one tick
///
/// Does nothing unless the world is playing. Returns the events raised this
/// tick, in the order they happened.
pub fn tick(world: &mut GameWorld, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if world.phase != GamePhase::Playing {
        return events;
    }

    update_player(world, input, &mut events);
    update_enemies(world, &mut events);
    if world.phase != GamePhase::Playing {
        // Game over mid-tick: freeze everything else where it is
        return events;
    }
    update_bullets(world, &mut events);
    update_powerups(world, &mut events);
    update_particles(world);

    world.ticks += 1;
    events
}

fn update_player(world: &mut GameWorld, input: &TickInput, events: &mut Vec<GameEvent>) {
    let tuning = &world.tuning;
    let player = &mut world.player;

    if let Some(expires) = player.boost_expires_at_tick {
        if world.ticks >= expires {
            player.shoot_delay = tuning.default_shoot_delay;
            player.boost_expires_at_tick = None;
            log::debug!("Rapid fire expired at tick {}", world.ticks);
            events.push(GameEvent::FireRateRestored);
        }
    }

    // Non-finite input would poison the position for good
    let movement = if input.movement.is_finite() {
        input.movement
    } else {
        Vec2::ZERO
    };
    player.pos = confine(player.pos + movement, player.half_extents(), world.field);
    player.thrusting = input.thrust;
    player.shooting = input.shoot;

    if player.shoot_cooldown > 0 {
        player.shoot_cooldown -= 1;
    }

    if player.shooting && player.shoot_cooldown == 0 {
        world.bullets.push(Bullet::new(player.nose()));
        player.shoot_cooldown = player.shoot_delay;
        let flash = player.pos - Vec2::new(0.0, SHOT_BURST_OFFSET);
        spawn_burst(
            &mut world.particles,
            &mut world.rng,
            world.particle_cap,
            flash,
            ParticleTint::Shot,
            SHOT_BURST,
        );
        events.push(GameEvent::ShotFired);
    }
}

fn update_enemies(world: &mut GameWorld, events: &mut Vec<GameEvent>) {
    if world.rng.random::<f64>() < world.tuning.enemy_spawn_chance {
        world.spawn_enemy();
    }

    let GameWorld {
        rng,
        tuning,
        field,
        phase,
        score,
        lives,
        player,
        enemies,
        particles,
        particle_cap,
        ..
    } = world;

    let target = player.pos;
    let player_half = player.width / 2.0;
    let exit_y = field.y + ENEMY_EXIT_MARGIN;

    enemies.retain_mut(|enemy| {
        if *phase != GamePhase::Playing {
            // Lives ran out earlier this tick
            return true;
        }

        if let Some(dir) = heading(enemy.pos, target) {
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * tuning.enemy_jitter,
                (rng.random::<f32>() - 0.5) * tuning.enemy_jitter,
            );
            enemy.pos += dir * enemy.speed * tuning.enemy_steer_factor + jitter;
        }

        if circles_overlap(target, player_half, enemy.pos, enemy.size / 2.0) {
            *lives = lives.saturating_sub(1);
            spawn_burst(
                particles,
                rng,
                *particle_cap,
                enemy.pos,
                ParticleTint::Enemy(enemy.archetype),
                HIT_BURST,
            );
            events.push(GameEvent::LifeLost { lives: *lives });
            events.push(GameEvent::LivesChanged { lives: *lives });

            if *lives == 0 {
                log::info!("Game over with score {}", *score);
                *phase = GamePhase::Menu;
                events.push(GameEvent::GameOver {
                    final_score: *score,
                });
                events.push(GameEvent::PhaseChanged {
                    from: GamePhase::Playing,
                    to: GamePhase::Menu,
                });
            }
            return false;
        }

        enemy.pos.y <= exit_y
    });
}

fn update_bullets(world: &mut GameWorld, events: &mut Vec<GameEvent>) {
    let GameWorld {
        rng,
        tuning,
        score,
        enemies,
        bullets,
        powerups,
        particles,
        particle_cap,
        ..
    } = world;

    bullets.retain_mut(|bullet| {
        bullet.pos.y -= bullet.speed;

        let bullet_half = bullet.width / 2.0;
        let hit = enemies
            .iter()
            .position(|e| circles_overlap(bullet.pos, bullet_half, e.pos, e.size / 2.0));

        if let Some(index) = hit {
            let enemy = enemies.remove(index);
            *score += enemy.score;
            spawn_burst(
                particles,
                rng,
                *particle_cap,
                enemy.pos,
                ParticleTint::Enemy(enemy.archetype),
                KILL_BURST,
            );
            events.push(GameEvent::EnemyDestroyed {
                score_value: enemy.score,
            });
            events.push(GameEvent::ScoreChanged { score: *score });

            if rng.random::<f64>() < tuning.powerup_drop_chance {
                let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
                powerups.push(PowerUp {
                    pos: enemy.pos,
                    kind,
                    size: POWERUP_SIZE,
                });
            }
            return false;
        }

        bullet.pos.y >= BULLET_EXIT_Y
    });
}

fn update_powerups(world: &mut GameWorld, events: &mut Vec<GameEvent>) {
    let GameWorld {
        rng,
        tuning,
        field,
        score,
        lives,
        ticks,
        player,
        powerups,
        particles,
        particle_cap,
        ..
    } = world;

    let exit_y = field.y + POWERUP_EXIT_MARGIN;

    powerups.retain_mut(|p| {
        p.pos.y += tuning.powerup_fall_speed;

        if circles_overlap(player.pos, player.width / 2.0, p.pos, p.size / 2.0) {
            match p.kind {
                PowerUpKind::ExtraLife => {
                    *lives = lives.saturating_add(1).min(tuning.max_lives);
                    events.push(GameEvent::LivesChanged { lives: *lives });
                }
                PowerUpKind::RapidFire => {
                    player.shoot_delay = player
                        .shoot_delay
                        .saturating_sub(tuning.rapid_fire_reduction)
                        .max(tuning.min_shoot_delay);
                    // Re-arms the single expiry; boosts never queue extra timers
                    player.boost_expires_at_tick =
                        Some(ticks.saturating_add(tuning.rapid_fire_ticks));
                }
                PowerUpKind::ScoreBonus => {
                    *score += tuning.score_bonus;
                    events.push(GameEvent::ScoreChanged { score: *score });
                }
            }
            log::debug!("Picked up {:?}", p.kind);
            spawn_burst(
                particles,
                rng,
                *particle_cap,
                p.pos,
                ParticleTint::Pickup,
                PICKUP_BURST,
            );
            events.push(GameEvent::PowerUpCollected { kind: p.kind });
            return false;
        }

        p.pos.y <= exit_y
    });
}

fn update_particles(world: &mut GameWorld) {
    let gravity = world.tuning.particle_gravity;
    let shrink = world.tuning.particle_shrink;

    world.particles.retain_mut(|p| {
        p.pos += p.vel;
        p.vel.y += gravity;
        p.radius *= shrink;
        p.life = p.life.saturating_sub(1);
        p.life > 0 && p.radius >= PARTICLE_VISIBLE_RADIUS
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EnemyArchetype, Particle};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// A playing world with no random spawns
    fn quiet_world(seed: u64) -> GameWorld {
        let tuning = Tuning {
            enemy_spawn_chance: 0.0,
            ..Tuning::default()
        };
        let mut world = GameWorld::new(
            seed,
            Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT),
            tuning,
        );
        world.phase = GamePhase::Playing;
        world
    }

    fn shoot() -> TickInput {
        TickInput {
            shoot: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_skipped_unless_playing() {
        let mut world = quiet_world(1);
        world.phase = GamePhase::Paused;
        let events = tick(&mut world, &shoot());
        assert!(events.is_empty());
        assert_eq!(world.ticks, 0);
        assert!(world.bullets.is_empty());

        world.phase = GamePhase::Menu;
        tick(&mut world, &shoot());
        assert_eq!(world.ticks, 0);
    }

    #[test]
    fn test_player_confined_to_field() {
        let mut world = quiet_world(1);
        let input = TickInput {
            movement: Vec2::new(-5000.0, 5000.0),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert_eq!(world.player.pos, Vec2::new(20.0, 570.0));
    }

    #[test]
    fn test_fire_period_matches_shoot_delay() {
        let mut world = quiet_world(1);
        let mut shot_ticks = Vec::new();
        for t in 0..100 {
            let events = tick(&mut world, &shoot());
            if events.contains(&GameEvent::ShotFired) {
                shot_ticks.push(t);
            }
        }
        assert_eq!(shot_ticks.first(), Some(&0));
        for pair in shot_ticks.windows(2) {
            assert_eq!(pair[1] - pair[0], 15);
        }
        assert_eq!(shot_ticks.len(), 7);
    }

    #[test]
    fn test_bullet_spawns_at_nose_with_burst() {
        let mut world = quiet_world(1);
        tick(&mut world, &shoot());
        assert_eq!(world.bullets.len(), 1);
        // Moved once already in the bullet step
        assert_eq!(world.bullets[0].pos, Vec2::new(400.0, 470.0 - BULLET_SPEED));
        assert_eq!(world.particles.len(), SHOT_BURST);
        assert!(world.particles.iter().all(|p| p.tint == ParticleTint::Shot));
    }

    #[test]
    fn test_bullet_leaves_top_edge() {
        let mut world = quiet_world(1);
        // -15 moves to -25, past the exit line
        world.bullets.push(Bullet::new(Vec2::new(100.0, -15.0)));
        tick(&mut world, &TickInput::default());
        assert!(world.bullets.is_empty());
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_bullet_just_above_field_survives() {
        let mut world = quiet_world(1);
        // -5 moves to -15, still inside the exit margin
        world.bullets.push(Bullet::new(Vec2::new(100.0, -5.0)));
        tick(&mut world, &TickInput::default());
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.bullets[0].pos.y, -5.0 - BULLET_SPEED);
    }

    #[test]
    fn test_bullet_kills_at_most_one_enemy() {
        let mut world = quiet_world(2);
        world.tuning.powerup_drop_chance = 0.0;
        // Two overlapping enemies far from the player
        world.spawn_enemy_at(EnemyArchetype::Crimson, Vec2::new(100.0, 100.0));
        world.spawn_enemy_at(EnemyArchetype::Emerald, Vec2::new(100.0, 100.0));
        world.bullets.push(Bullet::new(Vec2::new(100.0, 110.0)));

        let events = tick(&mut world, &TickInput::default());
        let kills: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .collect();
        assert_eq!(kills.len(), 1);
        assert_eq!(world.enemies.len(), 1);
        assert!(world.bullets.is_empty());
        // First in existence order dies
        assert_eq!(world.enemies[0].archetype, EnemyArchetype::Emerald);
        assert_eq!(world.score, 10);
    }

    #[test]
    fn test_rammed_enemy_cannot_also_be_shot() {
        let mut world = quiet_world(3);
        let at = world.player.pos;
        world.spawn_enemy_at(EnemyArchetype::Amber, at);
        world.bullets.push(Bullet::new(at + Vec2::new(0.0, BULLET_SPEED)));

        let events = tick(&mut world, &TickInput::default());
        assert!(events.contains(&GameEvent::LifeLost { lives: 2 }));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
        );
        assert_eq!(world.score, 0);
        assert_eq!(world.bullets.len(), 1);
    }

    #[test]
    fn test_last_life_ends_game_once() {
        let mut world = quiet_world(4);
        world.lives = 1;
        world.score = 70;
        let at = world.player.pos;
        world.spawn_enemy_at(EnemyArchetype::Crimson, at);
        world.spawn_enemy_at(EnemyArchetype::Amber, at);

        let events = tick(&mut world, &TickInput::default());
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert!(events.contains(&GameEvent::GameOver { final_score: 70 }));
        assert_eq!(world.lives, 0);
        assert_eq!(world.phase, GamePhase::Menu);
        // Second enemy survives untouched, no second decrement
        assert_eq!(world.enemies.len(), 1);

        // Further ticks are inert
        assert!(tick(&mut world, &TickInput::default()).is_empty());
        assert_eq!(world.lives, 0);
    }

    #[test]
    fn test_enemy_homes_toward_player() {
        let mut world = quiet_world(5);
        world.tuning.enemy_jitter = 0.0;
        world.spawn_enemy_at(EnemyArchetype::Amber, Vec2::new(400.0, 100.0));
        tick(&mut world, &TickInput::default());
        // Straight down at 70% of 2.0
        let pos = world.enemies[0].pos;
        assert!((pos.x - 400.0).abs() < 1e-4);
        assert!((pos.y - 101.4).abs() < 1e-4);
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let mut world = quiet_world(6);
        world.spawn_enemy_at(EnemyArchetype::Amber, Vec2::new(400.0, 100.0));
        let before = world.enemies[0].pos;
        tick(&mut world, &TickInput::default());
        let step = world.enemies[0].pos - before - Vec2::new(0.0, 1.4);
        assert!(step.x.abs() <= 0.25 + 1e-4 && step.y.abs() <= 0.25 + 1e-4);
    }

    #[test]
    fn test_enemy_culled_below_field() {
        let mut world = quiet_world(7);
        // Player at the far left so the enemy keeps drifting, not colliding
        world.player.pos = Vec2::new(20.0, 570.0);
        world.spawn_enemy_at(EnemyArchetype::Crimson, Vec2::new(780.0, 660.0));
        let events = tick(&mut world, &TickInput::default());
        assert!(world.enemies.is_empty());
        assert!(events.is_empty());
        assert_eq!(world.lives, 3);
    }

    #[test]
    fn test_extra_life_caps_at_max() {
        let mut world = quiet_world(8);
        world.lives = 5;
        let at = world.player.pos;
        world.powerups.push(PowerUp {
            pos: at,
            kind: PowerUpKind::ExtraLife,
            size: POWERUP_SIZE,
        });
        let events = tick(&mut world, &TickInput::default());
        assert_eq!(world.lives, 5);
        assert!(events.contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::ExtraLife
        }));
        assert!(world.powerups.is_empty());
        assert_eq!(world.particles.len(), PICKUP_BURST);
    }

    #[test]
    fn test_score_bonus() {
        let mut world = quiet_world(8);
        let at = world.player.pos;
        world.powerups.push(PowerUp {
            pos: at,
            kind: PowerUpKind::ScoreBonus,
            size: POWERUP_SIZE,
        });
        let events = tick(&mut world, &TickInput::default());
        assert_eq!(world.score, 50);
        assert!(events.contains(&GameEvent::ScoreChanged { score: 50 }));
    }

    #[test]
    fn test_rapid_fire_reverts_after_ten_seconds() {
        let mut world = quiet_world(9);
        world.ticks = 100;
        let at = world.player.pos;
        world.powerups.push(PowerUp {
            pos: at,
            kind: PowerUpKind::RapidFire,
            size: POWERUP_SIZE,
        });
        tick(&mut world, &TickInput::default());
        assert_eq!(world.player.shoot_delay, 12);
        assert_eq!(world.player.boost_expires_at_tick, Some(700));

        // Still boosted on the last tick of the window
        while world.ticks < 700 {
            let events = tick(&mut world, &TickInput::default());
            assert!(!events.contains(&GameEvent::FireRateRestored));
            assert_eq!(world.player.shoot_delay, 12);
        }
        let events = tick(&mut world, &TickInput::default());
        assert!(events.contains(&GameEvent::FireRateRestored));
        assert_eq!(world.player.shoot_delay, 15);
        assert_eq!(world.player.boost_expires_at_tick, None);
    }

    #[test]
    fn test_rapid_fire_floor_and_rearm() {
        let mut world = quiet_world(10);
        let at = world.player.pos;
        for _ in 0..5 {
            world.powerups.push(PowerUp {
                pos: at,
                kind: PowerUpKind::RapidFire,
                size: POWERUP_SIZE,
            });
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.player.shoot_delay, 5);
        // Latest pickup (during tick 4) governs the deadline
        assert_eq!(world.player.boost_expires_at_tick, Some(604));
    }

    #[test]
    fn test_huge_boost_duration_saturates() {
        let mut world = quiet_world(10);
        world.tuning.rapid_fire_ticks = u64::MAX;
        world.ticks = 1;
        let at = world.player.pos;
        world.powerups.push(PowerUp {
            pos: at,
            kind: PowerUpKind::RapidFire,
            size: POWERUP_SIZE,
        });
        tick(&mut world, &TickInput::default());
        assert_eq!(world.player.boost_expires_at_tick, Some(u64::MAX));

        // Deadline never wraps into the past
        let events = tick(&mut world, &TickInput::default());
        assert!(!events.contains(&GameEvent::FireRateRestored));
        assert_eq!(world.player.shoot_delay, 12);
    }

    #[test]
    fn test_sanitized_tuning_keeps_lives_in_range() {
        let tuning = Tuning::from_json(r#"{ "max_lives": 9, "starting_lives": 9 }"#).unwrap();
        let mut world = GameWorld::new(
            3,
            Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT),
            tuning,
        );
        world.phase = GamePhase::Playing;
        world.tuning.enemy_spawn_chance = 0.0;
        assert_eq!(world.lives, 5);

        let at = world.player.pos;
        world.powerups.push(PowerUp {
            pos: at,
            kind: PowerUpKind::ExtraLife,
            size: POWERUP_SIZE,
        });
        tick(&mut world, &TickInput::default());
        assert_eq!(world.lives, 5);
    }

    #[test]
    fn test_sanitized_fall_speed_still_clears_powerups() {
        let tuning = Tuning::from_json(r#"{ "powerup_fall_speed": -3.0, "enemy_spawn_chance": 0.0 }"#)
            .unwrap();
        let mut world = GameWorld::new(
            4,
            Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT),
            tuning,
        );
        world.phase = GamePhase::Playing;
        world.powerups.push(PowerUp {
            pos: Vec2::new(100.0, 0.0),
            kind: PowerUpKind::ScoreBonus,
            size: POWERUP_SIZE,
        });
        let mut ticks = 0;
        while !world.powerups.is_empty() {
            tick(&mut world, &TickInput::default());
            ticks += 1;
            assert!(ticks < 100_000, "power-up never left the field");
        }
    }

    #[test]
    fn test_powerup_falls_and_exits() {
        let mut world = quiet_world(11);
        world.powerups.push(PowerUp {
            pos: Vec2::new(100.0, 619.0),
            kind: PowerUpKind::ScoreBonus,
            size: POWERUP_SIZE,
        });
        tick(&mut world, &TickInput::default());
        assert!(world.powerups.is_empty());
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_particle_integration() {
        let mut world = quiet_world(12);
        world.particles.push(Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(1.0, -2.0),
            radius: 2.0,
            tint: ParticleTint::Pickup,
            life: PARTICLE_LIFE,
        });
        tick(&mut world, &TickInput::default());
        let p = &world.particles[0];
        assert_eq!(p.pos, Vec2::new(11.0, 8.0));
        assert!((p.vel.y - -1.9).abs() < 1e-6);
        assert!((p.radius - 1.94).abs() < 1e-6);
        assert_eq!(p.life, PARTICLE_LIFE - 1);
    }

    #[test]
    fn test_particles_gone_by_end_of_life() {
        let mut world = quiet_world(13);
        world.spawn_particles(Vec2::new(400.0, 100.0), ParticleTint::Shot, 50);
        for _ in 0..PARTICLE_LIFE {
            tick(&mut world, &TickInput::default());
        }
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameWorld::new(99999, Vec2::new(800.0, 600.0), Tuning::default());
        let mut b = GameWorld::new(99999, Vec2::new(800.0, 600.0), Tuning::default());
        a.phase = GamePhase::Playing;
        b.phase = GamePhase::Playing;
        for i in 0..600 {
            let input = TickInput {
                movement: Vec2::new(if i % 120 < 60 { 5.0 } else { -5.0 }, 0.0),
                shoot: true,
                thrust: false,
            };
            assert_eq!(tick(&mut a, &input), tick(&mut b, &input));
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.pos, b.player.pos);
    }

    proptest! {
        #[test]
        fn prop_lives_bounded_and_score_monotonic(
            seed in any::<u64>(),
            moves in prop::collection::vec((-1i8..=1, -1i8..=1, any::<bool>()), 1..400),
        ) {
            let tuning = Tuning { enemy_spawn_chance: 0.2, powerup_drop_chance: 0.5, ..Tuning::default() };
            let mut world = GameWorld::new(seed, Vec2::new(400.0, 300.0), tuning);
            world.phase = GamePhase::Playing;
            let mut last_score = 0;
            for (dx, dy, fire) in moves {
                let input = TickInput {
                    movement: Vec2::new(dx as f32, dy as f32) * PLAYER_SPEED,
                    shoot: fire,
                    thrust: dy < 0,
                };
                tick(&mut world, &input);
                prop_assert!(world.lives <= 5);
                prop_assert!(world.score >= last_score);
                last_score = world.score;

                let half = world.player.half_extents();
                let pos = world.player.pos;
                prop_assert!(pos.x >= half.x && pos.x <= world.field.x - half.x);
                prop_assert!(pos.y >= half.y && pos.y <= world.field.y - half.y);
            }
        }
    }
}
