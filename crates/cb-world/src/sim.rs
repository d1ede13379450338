//! Deterministic simulated party world.
//!
//! # Model
//!
//! * Members move in straight lines towards their last `move_to` target at a
//!   fixed speed, regenerate energy continuously, and are busy while a cast
//!   is in progress.
//! * Hostiles are points in a [`HostileIndex`]; they wander by a bounded
//!   random step each advance when `hostile_wander > 0`.
//! * Perceived hostile distance carries per-member sensor noise drawn from
//!   the member's own [`AgentRng`], so two members never share a stream.
//!
//! All state changes happen in [`SimWorld::advance`] or through a
//! [`MemberEnv`] command; perception reads are pure.

use rustc_hash::FxHashMap;
use tracing::trace;

use cb_core::{
    AccountId, AgentId, AgentRng, ItemModelId, Millis, Position, Range, Role, SimRng, SkillId,
};

use crate::{AllyInfo, Environment, HostileIndex, Signals, WorldError, WorldResult};

/// Agent ids are renumbered by this stride on every map transition.
const TRANSITION_STRIDE: u32 = 100;

// ── Skills ────────────────────────────────────────────────────────────────────

/// A skill slotted in a simulated member's build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimSkill {
    pub id: SkillId,
    pub energy_cost: f32,
    pub cast_ms: u64,
    pub recharge_ms: u64,
}

impl SimSkill {
    pub fn new(id: SkillId, energy_cost: f32, cast_ms: u64, recharge_ms: u64) -> Self {
        Self { id, energy_cost, cast_ms, recharge_ms }
    }
}

// ── MemberSpec ────────────────────────────────────────────────────────────────

/// Initial description of one party member.
#[derive(Clone, Debug)]
pub struct MemberSpec {
    pub account: AccountId,
    pub role: Role,
    pub position: Position,
    pub max_energy: f32,
    /// Energy regained per second.
    pub energy_regen: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    pub leader: bool,
    pub skills: Vec<SimSkill>,
    pub inventory: Vec<(ItemModelId, u32)>,
}

impl MemberSpec {
    pub fn new(account: AccountId, role: Role, position: Position) -> Self {
        Self {
            account,
            role,
            position,
            max_energy: 30.0,
            energy_regen: 1.0,
            speed: 288.0,
            leader: false,
            skills: Vec::new(),
            inventory: Vec::new(),
        }
    }

    pub fn leader(mut self) -> Self {
        self.leader = true;
        self
    }

    pub fn energy(mut self, max: f32, regen_per_sec: f32) -> Self {
        self.max_energy = max;
        self.energy_regen = regen_per_sec;
        self
    }

    pub fn with_skill(mut self, skill: SimSkill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_item(mut self, model: ItemModelId, count: u32) -> Self {
        self.inventory.push((model, count));
        self
    }
}

// ── Member ────────────────────────────────────────────────────────────────────

struct Member {
    account: AccountId,
    agent: AgentId,
    role: Role,
    position: Position,
    move_target: Option<Position>,
    speed: f32,
    energy: f32,
    max_energy: f32,
    energy_regen: f32,
    leader: bool,
    alive: bool,
    skills: Vec<SimSkill>,
    ready_at: FxHashMap<SkillId, Millis>,
    casting_until: Millis,
    inventory: FxHashMap<ItemModelId, u32>,
    items_used: FxHashMap<ItemModelId, u32>,
    buffs_received: u32,
    casts: Vec<(SkillId, Option<AgentId>)>,
    perceived_hostile: Option<f32>,
    in_combat: bool,
    rng: AgentRng,
}

impl Member {
    fn skill(&self, id: SkillId) -> Option<&SimSkill> {
        self.skills.iter().find(|s| s.id == id)
    }
}

// ── SimWorldBuilder ───────────────────────────────────────────────────────────

/// Construct a [`SimWorld`] incrementally, then call [`build`](Self::build).
pub struct SimWorldBuilder {
    seed: u64,
    start: Millis,
    members: Vec<MemberSpec>,
    hostiles: Vec<Position>,
    sensor_noise: f32,
    hostile_wander: f32,
    combat_range: f32,
}

impl SimWorldBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start: Millis::ZERO,
            members: Vec::new(),
            hostiles: Vec::new(),
            sensor_noise: 0.0,
            hostile_wander: 0.0,
            combat_range: Range::Area.units(),
        }
    }

    pub fn start_at(mut self, start: Millis) -> Self {
        self.start = start;
        self
    }

    /// Add a member; returns the agent id it will have in the first map.
    pub fn member(&mut self, spec: MemberSpec) -> AgentId {
        self.members.push(spec);
        AgentId(self.members.len() as u32 - 1)
    }

    pub fn hostile(&mut self, pos: Position) -> &mut Self {
        self.hostiles.push(pos);
        self
    }

    /// Amplitude of the uniform noise added to perceived hostile distance.
    pub fn sensor_noise(mut self, amplitude: f32) -> Self {
        self.sensor_noise = amplitude.max(0.0);
        self
    }

    /// Maximum per-second random step of every hostile.
    pub fn hostile_wander(mut self, units_per_sec: f32) -> Self {
        self.hostile_wander = units_per_sec.max(0.0);
        self
    }

    /// Hostiles closer than this put a member in combat.
    pub fn combat_range(mut self, units: f32) -> Self {
        self.combat_range = units;
        self
    }

    pub fn build(self) -> SimWorld {
        let members = self
            .members
            .into_iter()
            .enumerate()
            .map(|(i, spec)| {
                let agent = AgentId(i as u32);
                Member {
                    account: spec.account,
                    agent,
                    role: spec.role,
                    position: spec.position,
                    move_target: None,
                    speed: spec.speed,
                    energy: spec.max_energy,
                    max_energy: spec.max_energy,
                    energy_regen: spec.energy_regen,
                    leader: spec.leader,
                    alive: true,
                    skills: spec.skills,
                    ready_at: FxHashMap::default(),
                    casting_until: Millis::ZERO,
                    inventory: spec.inventory.into_iter().collect(),
                    items_used: FxHashMap::default(),
                    buffs_received: 0,
                    casts: Vec::new(),
                    perceived_hostile: None,
                    in_combat: false,
                    rng: AgentRng::new(self.seed, agent),
                }
            })
            .collect();

        let mut world = SimWorld {
            members,
            hostiles: HostileIndex::new(self.hostiles),
            rng: SimRng::new(self.seed),
            now: self.start,
            loaded: true,
            in_explorable: true,
            sensor_noise: self.sensor_noise,
            hostile_wander: self.hostile_wander,
            combat_range: self.combat_range,
            agent_base: 0,
        };
        world.refresh_perception();
        world
    }
}

// ── SimWorld ──────────────────────────────────────────────────────────────────

/// A whole simulated party plus the hostiles around it.
pub struct SimWorld {
    members: Vec<Member>,
    hostiles: HostileIndex,
    rng: SimRng,
    now: Millis,
    loaded: bool,
    in_explorable: bool,
    sensor_noise: f32,
    hostile_wander: f32,
    combat_range: f32,
    agent_base: u32,
}

impl SimWorld {
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Per-member `Environment` view, or `None` if `index` is out of range.
    pub fn member_env(&mut self, index: usize) -> Option<MemberEnv<'_>> {
        (index < self.members.len()).then_some(MemberEnv { world: self, index })
    }

    // ── World control ─────────────────────────────────────────────────────

    /// Advance simulated time by `dt_ms`: movement, energy, hostile drift.
    pub fn advance(&mut self, dt_ms: u64) {
        self.now = self.now.plus(dt_ms);
        let secs = dt_ms as f32 / 1000.0;

        for m in self.members.iter_mut().filter(|m| m.alive) {
            if let Some(target) = m.move_target {
                m.position = m.position.step_towards(target, m.speed * secs);
                if m.position == target {
                    m.move_target = None;
                }
            }
            m.energy = (m.energy + m.energy_regen * secs).min(m.max_energy);
        }

        if self.hostile_wander > 0.0 && !self.hostiles.is_empty() {
            let step = self.hostile_wander * secs;
            let rng = &mut self.rng;
            self.hostiles.update(|_, p| {
                p.x += rng.gen_range(-step..=step);
                p.y += rng.gen_range(-step..=step);
            });
        }

        self.refresh_perception();
    }

    /// Simulate a map change: the environment unloads and every member gets
    /// a new in-session agent id.  Account identities are unchanged.
    pub fn transition(&mut self) {
        self.agent_base += TRANSITION_STRIDE;
        for (i, m) in self.members.iter_mut().enumerate() {
            m.agent = AgentId(self.agent_base + i as u32);
            m.move_target = None;
            m.casting_until = Millis::ZERO;
        }
        self.loaded = false;
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    pub fn set_explorable(&mut self, explorable: bool) {
        self.in_explorable = explorable;
    }

    pub fn spawn_hostile(&mut self, pos: Position) {
        self.hostiles.push(pos);
        self.refresh_perception();
    }

    /// Remove hostiles near `center` (a fight won).
    pub fn clear_hostiles_around(&mut self, center: Position, radius: f32) -> usize {
        let n = self.hostiles.clear_around(center, radius);
        self.refresh_perception();
        n
    }

    pub fn set_alive(&mut self, index: usize, alive: bool) {
        if let Some(m) = self.members.get_mut(index) {
            m.alive = alive;
        }
    }

    pub fn set_energy(&mut self, index: usize, energy: f32) {
        if let Some(m) = self.members.get_mut(index) {
            m.energy = energy.clamp(0.0, m.max_energy);
        }
    }

    pub fn teleport(&mut self, index: usize, pos: Position) {
        if let Some(m) = self.members.get_mut(index) {
            m.position = pos;
            m.move_target = None;
        }
        self.refresh_perception();
    }

    // ── Read-only accessors ───────────────────────────────────────────────

    pub fn account_of(&self, index: usize) -> Option<&AccountId> {
        self.members.get(index).map(|m| &m.account)
    }

    pub fn agent_of(&self, index: usize) -> Option<AgentId> {
        self.members.get(index).map(|m| m.agent)
    }

    pub fn position_of(&self, index: usize) -> Option<Position> {
        self.members.get(index).map(|m| m.position)
    }

    pub fn energy_of(&self, index: usize) -> Option<f32> {
        self.members.get(index).map(|m| m.energy)
    }

    pub fn items_used(&self, index: usize, model: ItemModelId) -> u32 {
        self.members
            .get(index)
            .and_then(|m| m.items_used.get(&model).copied())
            .unwrap_or(0)
    }

    pub fn buffs_received(&self, index: usize) -> u32 {
        self.members.get(index).map_or(0, |m| m.buffs_received)
    }

    /// Every cast the member has started, in order.
    pub fn casts(&self, index: usize) -> &[(SkillId, Option<AgentId>)] {
        self.members.get(index).map_or(&[], |m| m.casts.as_slice())
    }

    pub fn hostiles(&self) -> &HostileIndex {
        &self.hostiles
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn refresh_perception(&mut self) {
        let noise = self.sensor_noise;
        for m in &mut self.members {
            let truth = self.hostiles.nearest_distance(m.position);
            m.in_combat = truth.is_some_and(|d| d <= self.combat_range);
            m.perceived_hostile = truth.map(|d| (d + m.rng.jitter(noise)).max(0.0));
        }
    }

    fn index_of_agent(&self, agent: AgentId) -> Option<usize> {
        self.members.iter().position(|m| m.agent == agent)
    }
}

// ── MemberEnv ─────────────────────────────────────────────────────────────────

/// One member's view of a [`SimWorld`].
pub struct MemberEnv<'w> {
    world: &'w mut SimWorld,
    index: usize,
}

impl MemberEnv<'_> {
    fn me(&self) -> &Member {
        &self.world.members[self.index]
    }

    fn me_mut(&mut self) -> &mut Member {
        &mut self.world.members[self.index]
    }

    fn ensure_loaded(&self) -> WorldResult<()> {
        if self.world.loaded { Ok(()) } else { Err(WorldError::NotLoaded) }
    }
}

impl Environment for MemberEnv<'_> {
    fn signals(&self) -> Option<Signals> {
        if !self.world.loaded {
            return None;
        }
        let me = self.me();
        Some(Signals {
            in_explorable: self.world.in_explorable,
            in_combat: me.alive && me.in_combat,
            nearest_hostile: me.perceived_hostile,
        })
    }

    fn account(&self) -> Option<AccountId> {
        Some(self.me().account.clone())
    }

    fn self_agent(&self) -> Option<AgentId> {
        self.world.loaded.then(|| self.me().agent)
    }

    fn position(&self) -> Option<Position> {
        self.world.loaded.then(|| self.me().position)
    }

    fn energy(&self) -> Option<f32> {
        self.world.loaded.then(|| self.me().energy)
    }

    fn is_party_leader(&self) -> bool {
        self.me().leader
    }

    fn allies(&self) -> Vec<AllyInfo> {
        if !self.world.loaded {
            return Vec::new();
        }
        self.world
            .members
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.index)
            .map(|(_, m)| AllyInfo {
                agent: m.agent,
                role: m.role,
                position: m.position,
                energy_ratio: if m.max_energy > 0.0 { m.energy / m.max_energy } else { 0.0 },
                alive: m.alive,
            })
            .collect()
    }

    fn item_count(&self, model: ItemModelId) -> u32 {
        self.me().inventory.get(&model).copied().unwrap_or(0)
    }

    fn has_skill(&self, skill: SkillId) -> bool {
        self.me().skill(skill).is_some()
    }

    fn skill_ready(&self, skill: SkillId) -> bool {
        let me = self.me();
        me.skill(skill).is_some()
            && me.ready_at.get(&skill).is_none_or(|t| *t <= self.world.now)
    }

    fn is_casting(&self) -> bool {
        self.me().casting_until > self.world.now
    }

    fn move_to(&mut self, target: Position) -> WorldResult<()> {
        self.ensure_loaded()?;
        trace!(member = self.index, %target, "move_to");
        self.me_mut().move_target = Some(target);
        Ok(())
    }

    fn cast_skill(&mut self, skill: SkillId, target: Option<AgentId>) -> WorldResult<()> {
        self.ensure_loaded()?;
        if self.is_casting() {
            return Err(WorldError::Busy);
        }
        let now = self.world.now;
        let me = self.me();
        let spec = *me.skill(skill).ok_or(WorldError::UnknownSkill(skill))?;
        if me.ready_at.get(&skill).is_some_and(|t| *t > now) {
            return Err(WorldError::OnCooldown(skill));
        }
        if me.energy < spec.energy_cost {
            return Err(WorldError::NotEnoughEnergy { needed: spec.energy_cost, available: me.energy });
        }

        let target_index = match target {
            Some(agent) => {
                let idx = self.world.index_of_agent(agent).ok_or(WorldError::UnknownTarget(agent))?;
                let t = &self.world.members[idx];
                if !t.alive {
                    return Err(WorldError::UnknownTarget(agent));
                }
                if !Range::Spellcast.contains(t.position.distance(self.me().position)) {
                    return Err(WorldError::OutOfRange(agent));
                }
                Some(idx)
            }
            None => None,
        };

        trace!(member = self.index, %skill, ?target, "cast_skill");
        let me = self.me_mut();
        me.energy -= spec.energy_cost;
        me.ready_at.insert(skill, now.plus(spec.cast_ms + spec.recharge_ms));
        me.casting_until = now.plus(spec.cast_ms);
        me.casts.push((skill, target));
        if let Some(idx) = target_index {
            self.world.members[idx].buffs_received += 1;
        }
        Ok(())
    }

    fn use_item(&mut self, model: ItemModelId) -> WorldResult<()> {
        self.ensure_loaded()?;
        let member = self.index;
        let me = self.me_mut();
        match me.inventory.get_mut(&model) {
            Some(n) if *n > 0 => {
                *n -= 1;
                *me.items_used.entry(model).or_insert(0) += 1;
                trace!(member, %model, "use_item");
                Ok(())
            }
            _ => Err(WorldError::ItemMissing(model)),
        }
    }
}
