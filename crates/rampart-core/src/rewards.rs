//! Victory payout and confirmation messages.

use rampart_protocol::{Notice, Winner};
use tracing::info;

use crate::config::SiegeConfig;
use crate::event::SiegeEvent;
use crate::world::World;

/// Pay out honor and gold to winning-side players near the city (or
/// everyone online when the radius is configured as 0). Non-recipients are
/// untouched.
pub(crate) fn dispatch(event: &SiegeEvent, config: &SiegeConfig, world: &mut dyn World, winner: Winner) {
    let winning_faction = match winner {
        Winner::Attackers => event.attacking_faction,
        Winner::Defenders => event.city.faction,
    };

    let players = if config.announce_radius > 0.0 {
        world.players_within(event.city.map, event.city.announce, config.announce_radius)
    } else {
        world.all_players()
    };

    let mut recipients = 0usize;
    for player in players {
        if player.faction != winning_faction || player.level < config.reward.min_level {
            continue;
        }
        let gold = config.reward.gold_base
            + config.reward.gold_per_level * u32::from(player.level);
        world.grant_honor(player.id, config.reward.honor);
        world.grant_gold(player.id, gold);
        world.send_notice(
            player.id,
            &Notice::Reward {
                city: event.city.name.clone(),
                honor: config.reward.honor,
                gold,
            },
        );
        recipients += 1;
    }

    info!(
        city = %event.city.name,
        ?winner,
        recipients,
        "siege rewards dispatched"
    );
}
