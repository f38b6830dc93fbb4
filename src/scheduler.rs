//! Turn scheduler: the debate state machine and runner.
//!
//! The schedule is a fixed cycle (moderator, then alternating pro/con
//! speakers). Transitions are deterministic and never branch on message
//! content; the only inputs are phase, current speaker, and round count.

use strum::Display;
use tracing::{debug, info};

use crate::config::DebateConfig;
use crate::error::{Result, RostraError};
use crate::persona::{Persona, Role};
use crate::provider::TextGenerator;
use crate::react::{react_reply, ToolRunner};
use crate::types::TurnMessage;

/// Coarse stage of the debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Opening,
    Debate,
    Closing,
}

/// Scheduled speaker slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Speaker {
    Moderator,
    Pro1,
    Con1,
    Pro2,
    Con2,
    Pro3,
    Con3,
    ModeratorClose,
}

/// The fixed debate-phase speaking cycle.
const CYCLE: [Speaker; 7] = [
    Speaker::Moderator,
    Speaker::Pro1,
    Speaker::Con1,
    Speaker::Pro2,
    Speaker::Con2,
    Speaker::Pro3,
    Speaker::Con3,
];

fn successor(current: Speaker) -> Speaker {
    let idx = CYCLE
        .iter()
        .position(|s| *s == current)
        .unwrap_or(CYCLE.len() - 1);
    CYCLE[(idx + 1) % CYCLE.len()]
}

/// Decide who speaks after `current`, given the phase and round count.
///
/// Returns `None` once the debate has closed. In the debate phase the cycle
/// wraps; when the wrap lands back on the moderator and the round count has
/// reached `max_rounds`, the turn routes to the closing slot instead.
pub fn next_speaker(
    phase: Phase,
    current: Speaker,
    round: u32,
    max_rounds: u32,
) -> Option<Speaker> {
    match phase {
        Phase::Opening => Some(Speaker::Pro1),
        Phase::Debate => {
            let next = successor(current);
            if next == Speaker::Moderator && round >= max_rounds {
                Some(Speaker::ModeratorClose)
            } else {
                Some(next)
            }
        }
        Phase::Closing => None,
    }
}

/// Full debate state. Advanced functionally: each turn consumes the previous
/// state and returns a new one.
#[derive(Debug, Clone)]
pub struct DebateState {
    pub transcript: Vec<TurnMessage>,
    pub current: Speaker,
    pub phase: Phase,
    pub round: u32,
    pub terminated: bool,
}

impl DebateState {
    /// Seed the starting state with a welcome message.
    pub fn new(welcome: TurnMessage) -> Self {
        Self {
            transcript: vec![welcome],
            current: Speaker::Moderator,
            phase: Phase::Opening,
            round: 0,
            terminated: false,
        }
    }
}

/// Apply one completed turn to the state.
///
/// Appends the message, increments the round exactly when `Con3` has spoken
/// (end of a full cycle), applies phase transitions, and marks termination
/// after the closing turn. The round that reaches `max_rounds` completes in
/// full before the closing check fires at the next wrap; that one-cycle lag
/// is intended.
pub fn advance(state: DebateState, message: TurnMessage, max_rounds: u32) -> DebateState {
    let speaker = state.current;
    let mut next = state;
    next.transcript.push(message);

    if speaker == Speaker::Con3 {
        next.round += 1;
        debug!(round = next.round, "cycle completed");
    }

    match next.phase {
        Phase::Opening => {
            next.phase = Phase::Debate;
            next.current = Speaker::Pro1;
        }
        Phase::Debate => {
            // The cycle always yields a successor in this phase.
            if let Some(upcoming) = next_speaker(Phase::Debate, speaker, next.round, max_rounds) {
                if upcoming == Speaker::ModeratorClose {
                    next.phase = Phase::Closing;
                }
                next.current = upcoming;
            }
        }
        Phase::Closing => {
            next.terminated = true;
        }
    }

    next
}

/// The seven debate personas, built once per run.
pub struct DebateRoster {
    moderator: Persona,
    pros: [Persona; 3],
    cons: [Persona; 3],
}

impl DebateRoster {
    /// Standard roster: a neutral moderator, three pro speakers, three con
    /// speakers. The first speaker of each team takes the ReAct path.
    pub fn standard() -> Self {
        let pro_caps = ["data analysis", "rational framing", "rigorous reasoning"];
        let con_caps = ["information retrieval", "emotional appeal", "humanistic concern"];
        Self {
            moderator: Persona::new(
                "Moderator",
                Role::Moderator,
                "You moderate this debate. Stay neutral, guide the exchange, and summarize outcomes.",
                &["hosting", "summarizing", "raising questions"],
            ),
            pros: [
                Persona::new(
                    "Pro1",
                    Role::Supporter,
                    "First pro speaker; ground your argument in retrieved information.",
                    &pro_caps,
                ),
                Persona::new(
                    "Pro2",
                    Role::Supporter,
                    "Second pro speaker; analyze cost and feasibility rationally.",
                    &pro_caps,
                ),
                Persona::new(
                    "Pro3",
                    Role::Supporter,
                    "Third pro speaker; reason rigorously about application prospects.",
                    &pro_caps,
                ),
            ],
            cons: [
                Persona::new(
                    "Con1",
                    Role::Opponent,
                    "First con speaker; ground your argument in retrieved information.",
                    &con_caps,
                ),
                Persona::new(
                    "Con2",
                    Role::Opponent,
                    "Second con speaker; speak to how the change affects teachers and students.",
                    &con_caps,
                ),
                Persona::new(
                    "Con3",
                    Role::Opponent,
                    "Third con speaker; focus on equity and ethics with humanistic concern.",
                    &con_caps,
                ),
            ],
        }
    }

    fn persona_mut(&mut self, speaker: Speaker) -> &mut Persona {
        match speaker {
            Speaker::Moderator | Speaker::ModeratorClose => &mut self.moderator,
            Speaker::Pro1 => &mut self.pros[0],
            Speaker::Pro2 => &mut self.pros[1],
            Speaker::Pro3 => &mut self.pros[2],
            Speaker::Con1 => &mut self.cons[0],
            Speaker::Con2 => &mut self.cons[1],
            Speaker::Con3 => &mut self.cons[2],
        }
    }
}

/// Phase-specific direction appended to the moderator's prompt.
fn moderator_direction(phase: Phase) -> &'static str {
    match phase {
        Phase::Opening => "Open the debate and invite the first pro speaker.",
        Phase::Debate => "Comment on the exchange so far and keep the debate moving.",
        Phase::Closing => "Summarize the debate and declare it closed.",
    }
}

/// Owns everything a debate run needs: roster, generator, tools, config, and
/// the live state. Single-threaded turn-by-turn use.
pub struct DebateRunner {
    roster: DebateRoster,
    generator: Box<dyn TextGenerator>,
    tools: ToolRunner,
    config: DebateConfig,
    state: DebateState,
}

impl DebateRunner {
    pub fn new(
        roster: DebateRoster,
        generator: Box<dyn TextGenerator>,
        tools: ToolRunner,
        config: DebateConfig,
        topic: &str,
    ) -> Self {
        let welcome = TurnMessage::new("System", format!("Welcome to the debate! Topic: {topic}"));
        Self {
            roster,
            generator,
            tools,
            config,
            state: DebateState::new(welcome),
        }
    }

    /// The live state.
    pub fn state(&self) -> &DebateState {
        &self.state
    }

    /// Produce exactly one turn and advance the state machine.
    pub async fn step(&mut self) -> Result<TurnMessage> {
        if self.state.terminated {
            return Err(RostraError::InvalidState(
                "debate already terminated".into(),
            ));
        }

        let speaker = self.state.current;
        let phase = self.state.phase;
        let window = self.config.window_size;
        let policy = self.config.failure_policy;

        debug!(%speaker, %phase, round = self.state.round, "taking turn");

        let message = match speaker {
            Speaker::Moderator | Speaker::ModeratorClose => {
                let persona = self.roster.persona_mut(speaker);
                let prompt = format!(
                    "{}\n\n{}",
                    persona.build_prompt(&self.state.transcript, window),
                    moderator_direction(phase),
                );
                let content = match self.generator.complete(&prompt).await {
                    Ok(text) => text,
                    Err(e) => match policy {
                        crate::config::FailurePolicy::Degrade => {
                            format!("[generation error] {e}")
                        }
                        crate::config::FailurePolicy::Propagate => return Err(e),
                    },
                };
                persona.record(content)
            }
            // First speaker of each team takes the think -> fetch -> respond path.
            Speaker::Pro1 | Speaker::Con1 => {
                let persona = self.roster.persona_mut(speaker);
                let context = persona.build_prompt(&self.state.transcript, window);
                let side = persona.role.to_string();
                let name = persona.name.clone();
                let content = react_reply(
                    &name,
                    &side,
                    &context,
                    self.generator.as_ref(),
                    &self.tools,
                    policy,
                )
                .await?;
                self.roster.persona_mut(speaker).record(content)
            }
            _ => {
                self.roster
                    .persona_mut(speaker)
                    .reply(
                        &self.state.transcript,
                        window,
                        self.generator.as_ref(),
                        policy,
                    )
                    .await?
            }
        };

        self.state = advance(self.state.clone(), message.clone(), self.config.max_rounds);

        Ok(message)
    }

    /// Run turns until termination, invoking `on_turn` for each message.
    pub async fn run(&mut self, mut on_turn: impl FnMut(&TurnMessage)) -> Result<()> {
        while !self.state.terminated {
            let message = self.step().await?;
            on_turn(&message);
        }
        info!(
            turns = self.state.transcript.len(),
            rounds = self.state.round,
            "debate finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn msg(speaker: &str) -> TurnMessage {
        TurnMessage::new(speaker, "content")
    }

    fn initial() -> DebateState {
        DebateState::new(msg("System"))
    }

    #[test]
    fn opening_routes_to_first_pro_speaker() {
        assert_eq!(
            next_speaker(Phase::Opening, Speaker::Moderator, 0, 3),
            Some(Speaker::Pro1)
        );
    }

    #[test]
    fn debate_cycle_follows_fixed_order() {
        let order = [
            (Speaker::Moderator, Speaker::Pro1),
            (Speaker::Pro1, Speaker::Con1),
            (Speaker::Con1, Speaker::Pro2),
            (Speaker::Pro2, Speaker::Con2),
            (Speaker::Con2, Speaker::Pro3),
            (Speaker::Pro3, Speaker::Con3),
            (Speaker::Con3, Speaker::Moderator),
        ];
        for (current, expected) in order {
            assert_eq!(
                next_speaker(Phase::Debate, current, 0, 3),
                Some(expected),
                "successor of {current}"
            );
        }
    }

    #[test]
    fn wrap_routes_to_closing_at_max_rounds() {
        assert_eq!(
            next_speaker(Phase::Debate, Speaker::Con3, 3, 3),
            Some(Speaker::ModeratorClose)
        );
        // The closing check only applies at the wrap point.
        assert_eq!(
            next_speaker(Phase::Debate, Speaker::Pro3, 3, 3),
            Some(Speaker::Con3)
        );
    }

    #[test]
    fn closing_is_terminal() {
        assert_eq!(next_speaker(Phase::Closing, Speaker::ModeratorClose, 3, 3), None);
    }

    #[test]
    fn advance_appends_exactly_one_message() {
        let state = initial();
        let next = advance(state, msg("Moderator"), 3);
        assert_eq!(next.transcript.len(), 2);
    }

    #[test]
    fn opening_turn_moves_to_debate_phase() {
        let next = advance(initial(), msg("Moderator"), 3);
        assert_eq!(next.phase, Phase::Debate);
        assert_eq!(next.current, Speaker::Pro1);
        assert_eq!(next.round, 0);
        assert!(!next.terminated);
    }

    #[test]
    fn round_increments_only_when_con3_finishes() {
        let mut state = advance(initial(), msg("Moderator"), 3);
        for expected_round in [0, 0, 0, 0, 0, 1] {
            let speaker = state.current;
            state = advance(state, msg(&speaker.to_string()), 3);
            assert_eq!(state.round, expected_round, "after {speaker}");
        }
        assert_eq!(state.current, Speaker::Moderator);
        assert_eq!(state.phase, Phase::Debate);
    }

    #[test]
    fn full_schedule_matches_worked_example() {
        // Start: welcome transcript, moderator, opening, round 0.
        let mut state = initial();
        let max_rounds = 3;

        // Opening turn, then three full cycles of seven speakers each
        // (moderator + six team members), minus the opening moderator turn
        // already taken for cycle one.
        state = advance(state, msg("Moderator"), max_rounds);
        for _ in 0..6 {
            state = advance(state, msg("x"), max_rounds);
        }
        assert_eq!(state.round, 1);
        assert_eq!(state.current, Speaker::Moderator);
        assert_eq!(state.phase, Phase::Debate);

        for _ in 0..7 {
            state = advance(state, msg("x"), max_rounds);
        }
        assert_eq!(state.round, 2);
        assert_eq!(state.current, Speaker::Moderator);

        for _ in 0..7 {
            state = advance(state, msg("x"), max_rounds);
        }
        assert_eq!(state.round, 3);
        assert_eq!(state.current, Speaker::ModeratorClose);
        assert_eq!(state.phase, Phase::Closing);
        assert!(!state.terminated);

        // Closing turn terminates.
        state = advance(state, msg("Moderator"), max_rounds);
        assert!(state.terminated);
        assert_eq!(state.phase, Phase::Closing);
    }

    #[test]
    fn termination_only_during_closing_turn() {
        let mut state = initial();
        let mut turns = 0;
        while !state.terminated {
            assert!(
                turns < 100,
                "debate failed to terminate within a sane bound"
            );
            state = advance(state, msg("x"), 2);
            turns += 1;
        }
        // Opening + 2 rounds x 7 speakers (first cycle reuses the opening
        // moderator turn, so 6 + 7) + closing.
        assert_eq!(turns, 1 + 6 + 7 + 1);
        assert_eq!(state.round, 2);
    }
}
