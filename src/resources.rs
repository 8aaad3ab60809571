//! Session-wide resources: the scoreboard and the prefab object pool.

use bevy::prelude::*;

use crate::components::{HitTag, ImpactEffect, Pooled, Projectile};
use crate::error::{TurretError, TurretResult};

/// Running score of the current session.
///
/// Inserted once by [`crate::TurretCorePlugin`] and mutated only through
/// [`Scoreboard::add_points`]. Restarting the session means replacing the
/// resource.
///
/// # Example
/// ```
/// use rotary_turret::resources::Scoreboard;
///
/// let mut score = Scoreboard::default();
/// score.add_points(10, false);
/// score.add_points(10, true);
/// assert_eq!(score.total(), 30);
/// ```
#[derive(Resource, Reflect, Default, Debug, Clone)]
#[reflect(Resource)]
pub struct Scoreboard {
    total: u64,
}

impl Scoreboard {
    /// Adds an award to the running total.
    ///
    /// A perfect hit is worth double.
    ///
    /// # Arguments
    /// * `amount` - Base points of the award
    /// * `perfect` - Whether the hit matched the target's tag
    ///
    /// # Returns
    /// The new total
    pub fn add_points(&mut self, amount: u32, perfect: bool) -> u64 {
        let award = if perfect {
            u64::from(amount) * 2
        } else {
            u64::from(amount)
        };
        self.total = self.total.saturating_add(award);
        self.total
    }

    /// Current total.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Handle to a prefab registered in an [`ObjectPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct PrefabId(pub usize);

/// What a pooled prefab is used for.
#[derive(Clone, Debug, PartialEq)]
pub enum PrefabKind {
    /// Fired from a weapon slot; gets a physics body and an impulse.
    Projectile {
        /// Mass (kg), converts the shot impulse into a launch velocity
        mass: f32,
    },
    /// Cosmetic one-shot spawned where a target was hit.
    Effect,
}

/// Template for entities handed out by the pool.
///
/// # Fields
/// * `name` - Debug name given to spawned entities
/// * `kind` - Projectile or cosmetic effect
/// * `tag` - Hit tag carried by spawned entities, compared against target tags
/// * `radius` - Collider and mesh radius
/// * `color` - Base color used by the VFX plugin
#[derive(Clone, Debug)]
pub struct Prefab {
    pub name: String,
    pub kind: PrefabKind,
    pub tag: Option<String>,
    pub radius: f32,
    pub color: Color,
}

impl Prefab {
    /// Projectile prefab carrying the given hit tag.
    pub fn projectile(name: impl Into<String>, tag: impl Into<String>, mass: f32) -> Self {
        Self {
            name: name.into(),
            kind: PrefabKind::Projectile { mass },
            tag: Some(tag.into()),
            radius: 0.1,
            color: Color::WHITE,
        }
    }

    /// Cosmetic effect prefab.
    pub fn effect(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PrefabKind::Effect,
            tag: None,
            radius: 0.3,
            color: Color::srgb(1.0, 0.8, 0.3),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Mass for projectile prefabs, `None` for effects.
    pub fn mass(&self) -> Option<f32> {
        match self.kind {
            PrefabKind::Projectile { mass } => Some(mass),
            PrefabKind::Effect => None,
        }
    }
}

/// Object pool for projectiles and hit effects.
///
/// Prefabs are registered once and addressed by [`PrefabId`]. Released
/// entities are hidden, taken out of the physics simulation and parked in a
/// per-prefab free list; [`ObjectPool::spawn`] reuses a parked entity before
/// creating a new one.
///
/// # Example
/// ```
/// use rotary_turret::resources::{ObjectPool, Prefab};
///
/// let mut pool = ObjectPool::new(16);
/// let bolt = pool.register(Prefab::projectile("Bolt", "Pinky", 0.2));
/// assert_eq!(pool.idle_count(bolt), 0);
/// assert_eq!(pool.prefab(bolt).unwrap().name, "Bolt");
/// ```
#[derive(Resource, Default)]
pub struct ObjectPool {
    prefabs: Vec<Prefab>,
    available: Vec<Vec<Entity>>,
    /// Maximum idle entities kept per prefab
    pub max_size: usize,
}

impl ObjectPool {
    /// Creates an empty pool keeping at most `max_size` idle entities per prefab.
    pub fn new(max_size: usize) -> Self {
        Self {
            prefabs: Vec::new(),
            available: Vec::new(),
            max_size,
        }
    }

    /// Registers a prefab and returns its handle.
    pub fn register(&mut self, prefab: Prefab) -> PrefabId {
        self.prefabs.push(prefab);
        self.available.push(Vec::with_capacity(self.max_size));
        PrefabId(self.prefabs.len() - 1)
    }

    /// Looks up a registered prefab.
    pub fn prefab(&self, id: PrefabId) -> TurretResult<&Prefab> {
        self.prefabs.get(id.0).ok_or(TurretError::UnknownPrefab(id))
    }

    /// Number of parked entities ready for reuse.
    pub fn idle_count(&self, id: PrefabId) -> usize {
        self.available.get(id.0).map_or(0, Vec::len)
    }

    /// Hands out an instance of `id` placed at `transform`.
    ///
    /// A parked entity is reactivated when one is available; otherwise a new
    /// entity is spawned with the prefab's name and tag. Physics bodies are
    /// attached separately once the entity is live.
    ///
    /// # Arguments
    /// * `commands` - Bevy Commands used to spawn or reactivate the entity
    /// * `id` - Prefab to instantiate
    /// * `transform` - Placement of the instance
    ///
    /// # Returns
    /// The entity handed out, or [`TurretError::UnknownPrefab`]
    pub fn spawn(
        &mut self,
        commands: &mut Commands,
        id: PrefabId,
        transform: Transform,
    ) -> TurretResult<Entity> {
        let prefab = self.prefabs.get(id.0).ok_or(TurretError::UnknownPrefab(id))?;
        let pooled = Pooled {
            prefab: id,
            active: true,
        };

        if let Some(entity) = self.available[id.0].pop() {
            commands
                .entity(entity)
                .insert((transform, Visibility::Visible, pooled));
            return Ok(entity);
        }

        let mut entity_commands = commands.spawn((
            Name::new(prefab.name.clone()),
            transform,
            Visibility::Visible,
            pooled,
        ));
        if let Some(tag) = &prefab.tag {
            entity_commands.insert(HitTag::new(tag.clone()));
        }
        Ok(entity_commands.id())
    }

    /// Returns an active instance to the pool.
    ///
    /// The entity is hidden and loses its [`Projectile`] or [`ImpactEffect`]
    /// state. It is parked for reuse while the prefab's free list has room,
    /// and despawned otherwise.
    /// Releasing an already-parked entity is a no-op.
    pub fn release(&mut self, commands: &mut Commands, entity: Entity, pooled: &Pooled) {
        let Some(available) = self.available.get_mut(pooled.prefab.0) else {
            warn!("release of {entity:?} with unknown prefab {:?}; despawning", pooled.prefab);
            commands.entity(entity).despawn();
            return;
        };
        if !pooled.active || available.contains(&entity) {
            return;
        }
        if available.len() >= self.max_size {
            commands.entity(entity).despawn();
            return;
        }

        available.push(entity);
        commands
            .entity(entity)
            .insert((
                Visibility::Hidden,
                Pooled {
                    prefab: pooled.prefab,
                    active: false,
                },
            ))
            .remove::<(Projectile, ImpactEffect)>();
    }
}
