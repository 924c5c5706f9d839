//! Handedness selection affordance
//!
//! Two buttons per slot, one per hand. The session shows them while a
//! player can still pick a stance; punching one reports the choice back
//! and the session hides the pair.

use crate::core::types::{PlayerId, Slot};
use crate::runtime::ctx::Ctx;
use crate::runtime::message::{Address, Message, OutputEvent};
use crate::strikes::catalog::Hand;

#[derive(Debug)]
pub struct HandednessButton {
    slot: Slot,
    hand: Hand,
    player: Option<PlayerId>,
    visible: bool,
}

impl HandednessButton {
    pub fn new(slot: Slot, hand: Hand) -> Self {
        Self {
            slot,
            hand,
            player: None,
            visible: false,
        }
    }

    pub fn handle(&mut self, msg: &Message, ctx: &mut Ctx<'_>) {
        match msg {
            Message::ShowHandednessButton { player } => {
                self.player = Some(*player);
                self.set_visible(true, ctx);
            }
            Message::HideButton => {
                self.set_visible(false, ctx);
            }
            Message::ButtonPressed { player } => {
                if self.visible && self.player == Some(*player) {
                    ctx.send(
                        Address::Session(self.slot),
                        Message::PlayerHandedness {
                            is_right_handed: self.hand == Hand::Right,
                        },
                    );
                }
            }
            Message::ResetGame => {
                self.player = None;
                self.set_visible(false, ctx);
            }
            _ => {}
        }
    }

    fn set_visible(&mut self, visible: bool, ctx: &mut Ctx<'_>) {
        self.visible = visible;
        ctx.emit(OutputEvent::ButtonVisible {
            slot: self.slot,
            hand: self.hand,
            visible,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ctx::test_ctx;
    use crate::runtime::message::Envelope;

    fn run(button: &mut HandednessButton, msg: Message) -> Vec<Envelope> {
        let (mut scheduler, mut scores, mut outputs) = test_ctx();
        let mut ctx = Ctx::new(&mut scheduler, &mut scores, &mut outputs);
        button.handle(&msg, &mut ctx);
        ctx.into_outbox()
    }

    #[test]
    fn press_by_the_bound_player_reports_handedness() {
        let mut button = HandednessButton::new(Slot::P0, Hand::Right);
        let player = PlayerId::new();
        run(&mut button, Message::ShowHandednessButton { player });
        let outbox = run(&mut button, Message::ButtonPressed { player });
        assert!(matches!(
            outbox.as_slice(),
            [Envelope {
                to: Address::Session(Slot::P0),
                msg: Message::PlayerHandedness {
                    is_right_handed: true
                },
            }]
        ));
    }

    #[test]
    fn press_by_another_player_is_ignored() {
        let mut button = HandednessButton::new(Slot::P0, Hand::Left);
        run(
            &mut button,
            Message::ShowHandednessButton {
                player: PlayerId::new(),
            },
        );
        let outbox = run(
            &mut button,
            Message::ButtonPressed {
                player: PlayerId::new(),
            },
        );
        assert!(outbox.is_empty());
    }

    #[test]
    fn hidden_button_does_not_respond() {
        let mut button = HandednessButton::new(Slot::P0, Hand::Left);
        let player = PlayerId::new();
        run(&mut button, Message::ShowHandednessButton { player });
        run(&mut button, Message::HideButton);
        assert!(run(&mut button, Message::ButtonPressed { player }).is_empty());
    }
}
