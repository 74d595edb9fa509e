use crate::ai::{Brain, Kinematics};
use crate::combat::{
    CombatEntity, Combatant, DamageOutcome, DamageReason, IncomingHit, knockback_toward,
};
use crate::config::{AbilityValues, ContactRules};
use crate::env::{DropEntry, EnemyKind, EnemyTemplate, RollStream};
use crate::state::{Body, EntityId, Millis, Vec2};

/// Velocity components below this snap to zero after integration.
const VELOCITY_EPSILON: f64 = 0.02;

/// A spawned enemy instance.
#[derive(Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub template_id: String,
    pub name: String,
    pub kind: EnemyKind,
    pub level: u32,
    pub body: Body,
    pub velocity: Vec2,
    pub speed: f64,
    pub contact_damage: f64,
    pub combat: CombatEntity,
    /// Set by the first hit with positive damage; disables first-hit bonuses.
    pub was_hit: bool,
    pub drop_table: Vec<DropEntry>,
    pub hit_sound: Option<String>,
    last_contact_hit: Millis,
    brain: Brain,
}

impl Enemy {
    pub fn spawn(
        id: EntityId,
        template_id: &str,
        template: &EnemyTemplate,
        pos: Vec2,
        rng: RollStream,
        regen_interval_ms: u64,
    ) -> Self {
        let owner = Combatant::Enemy {
            entity: id,
            template: template_id.to_string(),
            kind: template.kind,
        };
        let combat = CombatEntity::new(
            owner,
            template.hp,
            template.weight,
            template.regen,
            regen_interval_ms,
        )
        .with_reward_xp(template.xp);

        Self {
            id,
            template_id: template_id.to_string(),
            name: template.name.clone(),
            kind: template.kind,
            level: template.level,
            body: Body::new(pos, template.size),
            velocity: Vec2::ZERO,
            speed: template.speed,
            contact_damage: template.damage,
            combat,
            was_hit: false,
            drop_table: template.drop_table.clone(),
            hit_sound: template.sounds.hit.clone(),
            last_contact_hit: Millis::ZERO,
            brain: Brain::new(template.movement, rng),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn combatant(&self) -> &Combatant {
        self.combat.owner()
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Apply a hit to this enemy.
    pub fn receive_hit(
        &mut self,
        amount: f64,
        knockback: Vec2,
        attacker: Option<Combatant>,
        reason: DamageReason,
        values: &AbilityValues,
    ) -> Option<DamageOutcome> {
        let mut hit = IncomingHit::new(amount, reason).with_knockback(knockback);
        hit.attacker = attacker;
        let outcome = self.combat.take_damage(hit, values);
        if amount > 0.0 {
            self.was_hit = true;
        }
        outcome
    }

    /// Run the movement AI; returns the sounds it requested.
    pub fn think(&mut self, player_center: Vec2, dt: f64) -> Vec<String> {
        let mut kin = Kinematics {
            center: self.center(),
            velocity: self.velocity,
            speed: self.speed,
        };
        let sounds = self.brain.think(&mut kin, player_center, dt);
        self.velocity = kin.velocity;
        sounds
    }

    /// Contact attack against the player, if in range and off cooldown.
    pub fn try_contact(&mut self, player_center: Vec2, now: Millis, rules: &ContactRules) -> Option<IncomingHit> {
        if self.center().distance(player_center) > rules.radius {
            return None;
        }
        if now.since(self.last_contact_hit) < rules.cooldown_ms {
            return None;
        }
        self.last_contact_hit = now;
        let knockback = knockback_toward(self.center(), player_center, rules.knockback);
        Some(
            IncomingHit::new(self.contact_damage, DamageReason::Contact)
                .with_knockback(knockback)
                .from_attacker(self.combatant().clone()),
        )
    }

    /// Apply knockback displacement, then velocity, then keep inside the zone.
    pub fn integrate(&mut self, displacement: Vec2, dt: f64, zone_size: f64) {
        self.body.pos += displacement;
        self.body.pos += self.velocity * dt;

        let (bounce_x, bounce_y) = self.body.clamp_to_zone(zone_size);
        if bounce_x {
            self.velocity.x = -self.velocity.x;
        }
        if bounce_y {
            self.velocity.y = -self.velocity.y;
        }
        if self.velocity.x.abs() < VELOCITY_EPSILON {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < VELOCITY_EPSILON {
            self.velocity.y = 0.0;
        }
    }
}
