//! Lobby event handlers

use tracing::{debug, info};
use uuid::Uuid;

use crate::game::{Direction, Kickoff, TickEvent};
use crate::game::countdown::CountdownStep;
use crate::matchmaking::{draft, MatchView};
use crate::players::identity::{random_color, random_display_name};
use crate::players::{Player, COMPUTER_ID};
use crate::ws::protocol::{ChatMessage, ServerMsg};

use super::chat::truncate_message;
use super::{ConnectionSender, Lobby, LobbyError};

const SPECTATING_SINGLE_PLAYER: &str = "[Private message] Hi there. A single player game is already in progress, but if you both join the matchmaking queue a multiplayer game will start instead.";
const SPECTATING_MULTIPLAYER: &str = "[Private message] Hi there. A multiplayer game is already in progress, and this server only supports two people playing at once :^(. Feel free to spectate and join the matchmaking queue.";

impl Lobby {
    fn player(&self, id: &Uuid) -> Result<&Player, LobbyError> {
        self.players.get(id).ok_or(LobbyError::UnknownConnection(*id))
    }

    fn is_participant(&self, id: &Uuid) -> bool {
        self.engine
            .participants()
            .is_some_and(|ids| ids.contains(id))
    }

    pub(super) fn on_connect(&mut self, id: Uuid, outbound: ConnectionSender) {
        let display_name = random_display_name(&mut self.rng);
        let color = random_color(&mut self.rng);
        self.outbound.register(id, outbound);

        for message in self.chat.history() {
            self.outbound.send_to(&id, ServerMsg::ChatMessage(message.clone()));
        }

        let is_spectator = self.engine.is_in_progress();
        if is_spectator {
            let notice = if self.engine.is_single_player() {
                SPECTATING_SINGLE_PLAYER
            } else {
                SPECTATING_MULTIPLAYER
            };
            self.send_chat_to(&id, ChatMessage::notice(notice));
        }

        let player = Player::new(display_name.clone(), color, id, is_spectator);
        self.players.insert(player.clone());
        info!(
            connection_id = %id,
            display_name = %display_name,
            is_spectator,
            "Player connected"
        );

        self.outbound.send_to(
            &id,
            ServerMsg::PlayerDetails {
                player,
                is_spectator,
            },
        );
        self.broadcast_chat(ChatMessage::notice(format!("{display_name} has arrived!")));
        self.broadcast_players();
    }

    pub(super) fn join_matchmaking(&mut self, id: Uuid) -> Result<(), LobbyError> {
        let name = self.player(&id)?.display_name.clone();
        if !self.queue.enqueue(id) {
            return Err(LobbyError::AlreadyQueued(id));
        }

        info!(connection_id = %id, queue_size = self.queue.len(), "Player joined matchmaking queue");
        self.broadcast_chat(ChatMessage::notice(format!(
            "{name} joined the matchmaking queue!"
        )));
        self.run_matchmaker();
        Ok(())
    }

    pub(super) fn leave_matchmaking(&mut self, id: Uuid) -> Result<(), LobbyError> {
        let name = self.player(&id)?.display_name.clone();
        if !self.queue.remove(&id) {
            return Err(LobbyError::NotQueued(id));
        }

        info!(connection_id = %id, queue_size = self.queue.len(), "Player left matchmaking queue");
        self.broadcast_chat(ChatMessage::notice(format!("{name} left the queue.")));
        Ok(())
    }

    pub(super) fn start_single_player(&mut self, id: Uuid) -> Result<(), LobbyError> {
        self.player(&id)?;

        if let Some(pending) = self.countdown.pending() {
            if pending.is_multiplayer() || !pending.involves(&id) {
                return Err(LobbyError::MatchInProgress);
            }
        }
        // Only the solo human may restart a running single-player match.
        if self.engine.is_in_progress() && !(self.engine.is_single_player() && self.is_participant(&id)) {
            return Err(LobbyError::MatchInProgress);
        }

        info!(connection_id = %id, "Single player countdown requested");
        self.broadcast_chat(ChatMessage::notice("Starting a Single Player Game :^)"));
        let first = self.countdown.begin(Kickoff::SinglePlayer { initiator: id });
        self.broadcast_chat(ChatMessage::notice(first));
        Ok(())
    }

    pub(super) fn stop_game(&mut self, id: Uuid) -> Result<(), LobbyError> {
        self.player(&id)?;

        let participant = self.is_participant(&id);
        let initiator = self
            .countdown
            .pending()
            .is_some_and(|kickoff| !kickoff.is_multiplayer() && kickoff.involves(&id));
        if !participant && !initiator {
            return Err(LobbyError::NotAllowed(id));
        }

        info!(connection_id = %id, "Stopping game on request");
        self.send_chat_to(&id, ChatMessage::notice("Stopping the game."));
        if initiator {
            self.countdown.cancel();
        }
        if participant {
            self.engine.stop();
        }
        self.players.clear_spectators();
        self.broadcast(ServerMsg::GameStopped);
        self.broadcast_players();
        self.run_matchmaker();
        Ok(())
    }

    pub(super) fn change_direction(
        &mut self,
        id: Uuid,
        direction: Direction,
    ) -> Result<(), LobbyError> {
        let game_state = self
            .engine
            .apply_direction(&id, direction)
            .cloned()
            .ok_or(LobbyError::NotAParticipant(id))?;
        self.broadcast(ServerMsg::GameUpdate { game_state });
        Ok(())
    }

    pub(super) fn player_chat(&mut self, id: Uuid, message: &str) -> Result<(), LobbyError> {
        let chat = ChatMessage::from_player(self.player(&id)?, truncate_message(message));
        self.broadcast_chat(chat);
        Ok(())
    }

    pub(super) fn on_disconnect(&mut self, id: Uuid) {
        self.outbound.unregister(&id);
        let Some(player) = self.players.remove(&id) else {
            debug!(connection_id = %id, "Disconnect for unknown connection");
            return;
        };

        info!(connection_id = %id, display_name = %player.display_name, "Player disconnected");
        self.queue.remove(&id);
        self.broadcast_chat(ChatMessage::notice(format!(
            "{} is no longer with us.",
            player.display_name
        )));

        if self.is_participant(&id) {
            self.engine.stop();
            self.broadcast_chat(ChatMessage::notice(
                "A player disconnected! A new game will start when two players are in queue.",
            ));
            self.broadcast(ServerMsg::GameStopped);
            self.players.clear_spectators();
            self.remake(id);
        }

        self.broadcast_players();

        if self.players.is_empty() {
            info!("Last player left, clearing match");
            self.countdown.cancel();
            self.engine.clear();
        }
    }

    /// Return the leaver's opponent to the front of the queue and try to
    /// start a replacement match.
    fn remake(&mut self, leaver: Uuid) {
        let survivor = self
            .engine
            .state()
            .and_then(|state| state.opponent_of(&leaver))
            .filter(|survivor| *survivor != COMPUTER_ID);

        if let Some(survivor) = survivor {
            if let Some(name) = self.players.get(&survivor).map(|p| p.display_name.clone()) {
                self.queue.push_front(survivor);
                info!(connection_id = %survivor, "Survivor returned to front of queue");
                self.broadcast_chat(ChatMessage::notice(format!(
                    "{name} has been returned to the queue."
                )));
            }
        }

        self.run_matchmaker();
    }

    fn run_matchmaker(&mut self) {
        let single_player_human = if self.engine.is_single_player() {
            self.engine.participants().map(|[human, _]| human)
        } else {
            None
        };
        let view = MatchView {
            in_progress: self.engine.is_in_progress(),
            single_player_human,
            multiplayer_pending: self
                .countdown
                .pending()
                .is_some_and(Kickoff::is_multiplayer),
        };

        let players = &self.players;
        let Some(drafted) = draft(&mut self.queue, view, |id| players.contains(id)) else {
            return;
        };

        self.players.draft(&drafted.player1);
        self.players.draft(&drafted.player2);
        for id in &drafted.spectators {
            self.players.set_spectator(id, true);
        }

        let name_of = |id: &Uuid| {
            self.players
                .get(id)
                .map(|p| p.display_name.clone())
                .unwrap_or_default()
        };
        let (name1, name2) = (name_of(&drafted.player1), name_of(&drafted.player2));
        self.broadcast_chat(ChatMessage::notice(format!(
            "Starting a Multiplayer game between {name1} & {name2}!"
        )));
        self.broadcast_players();

        let first = self.countdown.begin(Kickoff::Multiplayer {
            player1: drafted.player1,
            player2: drafted.player2,
        });
        self.broadcast_chat(ChatMessage::notice(first));
    }

    pub(super) fn on_countdown_step(&mut self, token: u64) -> Result<(), LobbyError> {
        match self.countdown.advance(token) {
            CountdownStep::Stale => {
                debug!(token, "Ignoring stale countdown step");
                Ok(())
            }
            CountdownStep::Announce(text) => {
                self.broadcast_chat(ChatMessage::notice(text));
                Ok(())
            }
            CountdownStep::Kickoff(kickoff) => {
                let result = self.kickoff(kickoff);
                self.countdown.finish();
                result
            }
        }
    }

    /// Start the counted-down match if everyone it needs is still here.
    fn kickoff(&mut self, kickoff: Kickoff) -> Result<(), LobbyError> {
        match kickoff {
            Kickoff::SinglePlayer { initiator } => {
                let Some(player) = self.players.get(&initiator).cloned() else {
                    self.broadcast_chat(ChatMessage::notice(
                        "Nevermind; the player who started left during countdown.",
                    ));
                    return Err(LobbyError::StaleKickoff("single player initiator left"));
                };

                self.engine.stop();
                let game_state = self.engine.start_single_player(player).clone();
                self.players.draft(&initiator);
                self.players.assign_participants(&[initiator]);
                self.broadcast(ServerMsg::SinglePlayerGameStart {
                    game_state,
                    participant_id: initiator,
                });
                self.broadcast_players();
                Ok(())
            }
            Kickoff::Multiplayer { player1, player2 } => {
                let first = self.players.get(&player1).cloned();
                let second = self.players.get(&player2).cloned();
                let (Some(first), Some(second)) = (first, second) else {
                    self.broadcast_chat(ChatMessage::notice(
                        "Nevermind; a player left during countdown.",
                    ));
                    // Whoever is still here keeps priority, player1 ahead of player2.
                    for survivor in [player2, player1] {
                        if self.players.contains(&survivor) {
                            self.queue.push_front(survivor);
                        }
                    }
                    self.run_matchmaker();
                    return Err(LobbyError::StaleKickoff("drafted player left"));
                };

                self.engine.stop();
                self.queue.remove(&player1);
                self.queue.remove(&player2);
                let game_state = self.engine.start_multiplayer(first, second).clone();
                self.players.draft(&player1);
                self.players.draft(&player2);
                self.players.assign_participants(&[player1, player2]);
                self.broadcast(ServerMsg::MultiPlayerGameStart {
                    game_state,
                    participant_ids: [player1, player2],
                });
                self.broadcast_players();
                Ok(())
            }
        }
    }

    pub(super) fn on_tick(&mut self, generation: u64) {
        let Some(outcome) = self.engine.tick(generation) else {
            return;
        };

        if let TickEvent::Goal { scorer } = outcome.event {
            let scorer = &outcome.state.paddle(scorer).info;
            debug!(connection_id = %scorer.connection_id, score = scorer.score, "Goal");
            self.players.set_score(&scorer.connection_id, scorer.score);
            self.broadcast_players();
        }

        self.broadcast(ServerMsg::GameUpdate {
            game_state: outcome.state,
        });
    }
}
