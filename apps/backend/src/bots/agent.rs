//! The timed bot agent.
//!
//! One actor per bot, spawned when its room's game starts. The agent never
//! touches `GameState`: the room pushes it view snapshots, and its timers
//! turn those into `ProposeMove`/`RequestPickup` messages: the identical
//! mailbox path human sessions use, so arbitration races between bot and
//! human resolve exactly like human-human races.
//!
//! Cycle: Idle → Thinking (delay sampled fresh from the profile each time)
//! → Proposing → Idle. A second, independent timer issues pickups at the
//! profile's interval while the hand is short and the kitty non-empty.

use actix::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use uuid::Uuid;

use crate::bots::profiles::{sample_think_delay, BotProfile};
use crate::bots::trait_def::{BotStrategy, BotView};
use crate::domain::state::Phase;
use crate::domain::HAND_LIMIT;
use crate::room::actor::{ProposeMove, RequestPickup};

/// Fresh state snapshot pushed by the room after every commit.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ViewUpdate(pub BotView);

/// Immediate shutdown; any in-flight decision is discarded, not queued.
#[derive(Message)]
#[rtype(result = "()")]
pub struct StopBot;

pub struct BotAgent {
    conn_id: Uuid,
    proposals: Recipient<ProposeMove>,
    pickups: Recipient<RequestPickup>,
    profile: &'static BotProfile,
    strategy: Box<dyn BotStrategy>,
    view: Option<BotView>,
    rng: StdRng,
}

impl BotAgent {
    pub fn new(
        conn_id: Uuid,
        proposals: Recipient<ProposeMove>,
        pickups: Recipient<RequestPickup>,
        profile: &'static BotProfile,
        strategy: Box<dyn BotStrategy>,
    ) -> Self {
        Self {
            conn_id,
            proposals,
            pickups,
            profile,
            strategy,
            view: None,
            rng: StdRng::from_entropy(),
        }
    }

    fn schedule_think(&mut self, ctx: &mut Context<Self>) {
        let delay = sample_think_delay(self.profile, &mut self.rng);
        ctx.run_later(delay, |agent, ctx| {
            agent.act_once();
            agent.schedule_think(ctx);
        });
    }

    /// One Thinking → Proposing step against the latest pushed view.
    /// No valid move means no action this cycle; the pickup timer or the
    /// arbiter's deadlock detector break any standoff.
    fn act_once(&mut self) {
        let Some(view) = &self.view else { return };
        if view.phase != Phase::InProgress {
            return;
        }
        if let Some(chosen) = self.strategy.choose_move(view) {
            debug!(
                bot = self.profile.name,
                card_id = chosen.card_id,
                pile = ?chosen.pile,
                "bot proposing move"
            );
            let _ = self.proposals.do_send(ProposeMove {
                conn_id: self.conn_id,
                card_id: chosen.card_id,
                pile: chosen.pile,
            });
        }
    }

    fn maybe_pickup(&mut self) {
        let Some(view) = &self.view else { return };
        if view.phase == Phase::InProgress && view.hand.len() < HAND_LIMIT && view.kitty_size > 0 {
            let _ = self.pickups.do_send(RequestPickup {
                conn_id: self.conn_id,
            });
        }
    }
}

impl Actor for BotAgent {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        debug!(bot = self.profile.name, "bot agent started");
        self.schedule_think(ctx);
        ctx.run_interval(self.profile.pickup_interval, |agent, _ctx| {
            agent.maybe_pickup();
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        debug!(bot = self.profile.name, "bot agent stopped");
    }
}

impl Handler<ViewUpdate> for BotAgent {
    type Result = ();

    fn handle(&mut self, msg: ViewUpdate, ctx: &mut Self::Context) -> Self::Result {
        let finished = msg.0.phase == Phase::Finished;
        self.view = Some(msg.0);
        if finished {
            // Stopping the actor cancels both timers, so nothing can be
            // proposed after the room reaches Finished.
            ctx.stop();
        }
    }
}

impl Handler<StopBot> for BotAgent {
    type Result = ();

    fn handle(&mut self, _msg: StopBot, ctx: &mut Self::Context) -> Self::Result {
        ctx.stop();
    }
}
