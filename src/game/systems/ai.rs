//! AI behavior state machine
//!
//! Decisions are re-evaluated every tick from a read-only view of the state,
//! then applied as drive commands. Priority order, first match wins:
//! heal-seek when badly hurt, threat response against the player (hunt or
//! avoid by mass ratio), heuristic pickup seeking, idle wander.

use hashbrown::HashMap;
use rand::Rng;

use crate::game::constants::ai::*;
use crate::game::game_loop::TickContext;
use crate::game::state::{GameState, PickupKind, VehicleId};
use crate::util::vec2::Vec2;

/// Current behavior of one bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Wander on a lazy random heading
    Idle,
    /// Run for the nearest heal pickup
    HealSeek,
    /// Chase the player
    Hunt,
    /// Keep away from the player
    Avoid,
    /// Head for the best-scored pickup or star
    Seek,
}

/// Bot archetype, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiClass {
    /// Sees further, prefers stars, never hunts
    Scout,
    Standard,
    /// Values power pickups while hunting
    Brute,
}

impl AiClass {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => AiClass::Scout,
            1 => AiClass::Standard,
            _ => AiClass::Brute,
        }
    }

    pub fn threat_radius(self) -> f32 {
        match self {
            AiClass::Scout => SCOUT_THREAT_RADIUS,
            _ => THREAT_RADIUS,
        }
    }
}

/// Per-bot behavior state
#[derive(Debug, Clone)]
pub struct AiState {
    pub behavior: Behavior,
    pub class: AiClass,
    wander_angle: f32,
    wander_ticks: u32,
}

impl AiState {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            behavior: Behavior::Idle,
            class: AiClass::random(rng),
            wander_angle: rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI),
            wander_ticks: 0,
        }
    }
}

/// One tick of drive intent for a bot
#[derive(Debug, Clone, Copy)]
pub struct AiCommand {
    pub id: VehicleId,
    pub desired_angle: f32,
    pub speed_mult: f32,
}

/// Owns behavior state for every bot
pub struct AiDirector {
    states: HashMap<VehicleId, AiState>,
}

impl AiDirector {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    pub fn register(&mut self, id: VehicleId, rng: &mut impl Rng) {
        self.states.insert(id, AiState::new(rng));
    }

    pub fn unregister(&mut self, id: VehicleId) {
        self.states.remove(&id);
    }

    pub fn get(&self, id: VehicleId) -> Option<&AiState> {
        self.states.get(&id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Evaluate every bot against the current state and return drive commands.
    /// Bots whose vehicle is gone or dead produce no command; the game loop
    /// unregisters them during compaction.
    pub fn think(
        &mut self,
        state: &GameState,
        ctx: &TickContext,
        rng: &mut impl Rng,
    ) -> Vec<AiCommand> {
        let mut commands = Vec::with_capacity(self.states.len());
        for (&id, ai) in self.states.iter_mut() {
            let bot = match state.get_vehicle(id) {
                Some(v) if v.alive => v,
                _ => continue,
            };

            let (target, speed_mult) = decide(ai, bot, state, ctx, rng);
            let desired_angle = (target - bot.position).angle();
            commands.push(AiCommand {
                id,
                desired_angle,
                speed_mult: speed_mult * ctx.ai_speed_mult,
            });
        }
        commands
    }
}

impl Default for AiDirector {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick a destination and speed multiplier for one bot
fn decide(
    ai: &mut AiState,
    bot: &crate::game::state::Vehicle,
    state: &GameState,
    ctx: &TickContext,
    rng: &mut impl Rng,
) -> (Vec2, f32) {
    // 1. Badly hurt and a heal exists: nothing else matters
    if bot.health_fraction() < HEAL_SEEK_HEALTH_FRAC {
        if let Some(pos) = nearest_pickup(state, bot.position, PickupKind::Heal) {
            ai.behavior = Behavior::HealSeek;
            return (pos, HEAL_SEEK_SPEED);
        }
    }

    // 2. Threat response against the player
    if let Some(player) = state.player().filter(|p| p.alive) {
        let same_team = bot.team.is_some() && bot.team == player.team;
        if !same_team {
            let radius = (ai.class.threat_radius() - ctx.threat_radius_cut).max(0.0);
            let dist = bot.position.distance_to(player.position);
            if dist < radius {
                if bot.mass > player.mass * HUNT_MASS_RATIO && ai.class != AiClass::Scout {
                    ai.behavior = Behavior::Hunt;
                    return (player.position, HUNT_SPEED);
                }
                ai.behavior = Behavior::Avoid;
                let away = (bot.position - player.position).normalize();
                return (bot.position + away * 100.0, AVOID_SPEED);
            }
        }
    }

    // 3. Heuristic seek: distance scaled by desirability, lowest score wins
    let was_hunting = ai.behavior == Behavior::Hunt;
    let mut best: Option<(f32, Vec2)> = None;
    for p in state.pickups.iter().filter(|p| !p.consumed) {
        let weight = match p.kind {
            PickupKind::Shield if bot.health_fraction() < SHIELD_HEALTH_FRAC => SHIELD_WEIGHT,
            PickupKind::Power if was_hunting => POWER_WEIGHT,
            _ => 1.0,
        };
        let score = bot.position.distance_to(p.position) * weight;
        if best.map_or(true, |(s, _)| score < s) {
            best = Some((score, p.position));
        }
    }
    let star_weight = if ai.class == AiClass::Scout {
        SCOUT_STAR_WEIGHT
    } else {
        STAR_WEIGHT
    };
    for s in state.stars.iter().filter(|s| !s.consumed) {
        let score = bot.position.distance_to(s.position) * star_weight;
        if best.map_or(true, |(sc, _)| score < sc) {
            best = Some((score, s.position));
        }
    }
    if let Some((_, pos)) = best {
        ai.behavior = Behavior::Seek;
        return (pos, 1.0);
    }

    // 4. Nothing to do: wander, nudging the heading now and then
    ai.behavior = Behavior::Idle;
    if ai.wander_ticks == 0 {
        ai.wander_angle += rng.gen_range(
            -std::f32::consts::FRAC_PI_2..std::f32::consts::FRAC_PI_2,
        );
        ai.wander_ticks = WANDER_INTERVAL;
    } else {
        ai.wander_ticks -= 1;
    }
    (
        bot.position + Vec2::from_angle(ai.wander_angle) * 100.0,
        WANDER_SPEED,
    )
}

fn nearest_pickup(state: &GameState, from: Vec2, kind: PickupKind) -> Option<Vec2> {
    state
        .pickups
        .iter()
        .filter(|p| !p.consumed && p.kind == kind)
        .map(|p| (p.position, from.distance_sq_to(p.position)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{GameState, Pickup, Star, Vehicle};

    fn ctx() -> TickContext {
        TickContext {
            tick: 0,
            traction: 1.0,
            ai_speed_mult: 1.0,
            threat_radius_cut: 0.0,
        }
    }

    fn state_with_bot(bot_pos: Vec2) -> (GameState, VehicleId) {
        let mut state = GameState::new(GameState::world_bounds(), "Driver");
        let bot = Vehicle::new_ai("Bot-0".into(), bot_pos);
        let id = bot.id;
        state.vehicles.insert(id, bot);
        (state, id)
    }

    fn push_pickup(state: &mut GameState, position: Vec2, kind: PickupKind) {
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            position,
            kind,
            consumed: false,
        });
    }

    fn standard_ai(id: VehicleId) -> AiDirector {
        // Fixed class so tests do not depend on the random roll
        let mut director = AiDirector::new();
        let mut rng = rand::thread_rng();
        director.register(id, &mut rng);
        director.states.get_mut(&id).unwrap().class = AiClass::Standard;
        director
    }

    #[test]
    fn test_heal_seek_overrides_prey() {
        let (mut state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        // Player is adjacent, tiny, and would normally be hunted
        if let Some(p) = state.player_mut() {
            p.position = Vec2::new(1050.0, 1000.0);
            p.mass = 10.0;
            p.update_mass_and_stats();
        }
        {
            let bot = state.vehicles.get_mut(&bot_id).unwrap();
            bot.mass = 300.0;
            bot.update_mass_and_stats();
            bot.health = bot.stats.max_health * 0.2;
        }
        push_pickup(&mut state, Vec2::new(900.0, 1000.0), PickupKind::Heal);

        let mut director = standard_ai(bot_id);
        let mut rng = rand::thread_rng();
        let commands = director.think(&state, &ctx(), &mut rng);
        assert_eq!(commands.len(), 1);
        assert_eq!(director.get(bot_id).unwrap().behavior, Behavior::HealSeek);
        // Heal is due west, so the desired angle points backward
        assert!(commands[0].desired_angle.abs() > 3.0);
    }

    #[test]
    fn test_hunt_when_heavier() {
        let (mut state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        if let Some(p) = state.player_mut() {
            p.position = Vec2::new(1200.0, 1000.0);
        }
        {
            let bot = state.vehicles.get_mut(&bot_id).unwrap();
            bot.mass = 200.0; // ratio 2.0 > 1.3
            bot.update_mass_and_stats();
        }

        let mut director = standard_ai(bot_id);
        let mut rng = rand::thread_rng();
        let commands = director.think(&state, &ctx(), &mut rng);
        assert_eq!(director.get(bot_id).unwrap().behavior, Behavior::Hunt);
        assert!((commands[0].speed_mult - HUNT_SPEED).abs() < 1e-5);
        assert!(commands[0].desired_angle.abs() < 0.01, "should aim at the player");
    }

    #[test]
    fn test_avoid_when_lighter() {
        let (mut state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        if let Some(p) = state.player_mut() {
            p.position = Vec2::new(1200.0, 1000.0);
            p.mass = 400.0;
            p.update_mass_and_stats();
        }

        let mut director = standard_ai(bot_id);
        let mut rng = rand::thread_rng();
        let commands = director.think(&state, &ctx(), &mut rng);
        assert_eq!(director.get(bot_id).unwrap().behavior, Behavior::Avoid);
        assert!((commands[0].speed_mult - AVOID_SPEED).abs() < 1e-5);
        assert!(
            commands[0].desired_angle.abs() > 3.0,
            "should flee away from the player"
        );
    }

    #[test]
    fn test_scout_never_hunts() {
        let (mut state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        if let Some(p) = state.player_mut() {
            p.position = Vec2::new(1500.0, 1000.0); // inside scout radius only
        }
        {
            let bot = state.vehicles.get_mut(&bot_id).unwrap();
            bot.mass = 300.0;
            bot.update_mass_and_stats();
        }

        let mut director = AiDirector::new();
        let mut rng = rand::thread_rng();
        director.register(bot_id, &mut rng);
        director.states.get_mut(&bot_id).unwrap().class = AiClass::Scout;
        director.think(&state, &ctx(), &mut rng);
        assert_eq!(director.get(bot_id).unwrap().behavior, Behavior::Avoid);
    }

    #[test]
    fn test_threat_radius_respected() {
        let (mut state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        // Player heavier but outside the standard 400-unit radius
        if let Some(p) = state.player_mut() {
            p.position = Vec2::new(1500.0, 1000.0);
            p.mass = 400.0;
            p.update_mass_and_stats();
        }
        push_pickup(&mut state, Vec2::new(800.0, 1000.0), PickupKind::Speed);

        let mut director = standard_ai(bot_id);
        let mut rng = rand::thread_rng();
        director.think(&state, &ctx(), &mut rng);
        assert_eq!(director.get(bot_id).unwrap().behavior, Behavior::Seek);
    }

    #[test]
    fn test_scout_prefers_stars() {
        let (mut state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        // Equidistant star and plain pickup: the star wins on weight for scouts
        push_pickup(&mut state, Vec2::new(1300.0, 1000.0), PickupKind::Speed);
        let sid = state.next_entity_id();
        state.stars.push(Star {
            id: sid,
            position: Vec2::new(700.0, 1000.0),
            consumed: false,
        });

        let mut director = AiDirector::new();
        let mut rng = rand::thread_rng();
        director.register(bot_id, &mut rng);
        director.states.get_mut(&bot_id).unwrap().class = AiClass::Scout;
        let commands = director.think(&state, &ctx(), &mut rng);
        assert!(
            commands[0].desired_angle.abs() > 3.0,
            "scout should pick the star to the west"
        );
    }

    #[test]
    fn test_idle_wander_when_field_is_empty() {
        let (state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        let mut director = standard_ai(bot_id);
        let mut rng = rand::thread_rng();
        let commands = director.think(&state, &ctx(), &mut rng);
        assert_eq!(director.get(bot_id).unwrap().behavior, Behavior::Idle);
        assert!((commands[0].speed_mult - WANDER_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_dead_bot_produces_no_command() {
        let (mut state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        state.vehicles.get_mut(&bot_id).unwrap().alive = false;
        let mut director = standard_ai(bot_id);
        let mut rng = rand::thread_rng();
        let commands = director.think(&state, &ctx(), &mut rng);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_level_speed_multiplier_applies() {
        let (state, bot_id) = state_with_bot(Vec2::new(1000.0, 1000.0));
        let mut director = standard_ai(bot_id);
        let mut rng = rand::thread_rng();
        let mut c = ctx();
        c.ai_speed_mult = 1.21;
        let commands = director.think(&state, &c, &mut rng);
        assert!((commands[0].speed_mult - WANDER_SPEED * 1.21).abs() < 1e-5);
    }
}
