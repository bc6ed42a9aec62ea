//! Control-authority bookkeeping from cruise buttons and SCC state.

use canfd_safety_core::VehicleState;

use crate::ids::button;
use crate::signals::ButtonState;

/// Button-driven engagement, used when openpilot owns longitudinal control.
///
/// Authority is granted on the release of SET or RESUME and revoked while
/// CANCEL is held. Without longitudinal control only the main-switch state is
/// recorded.
pub fn cruise_buttons_check(vehicle: &mut VehicleState, state: ButtonState, longitudinal: bool) {
    if longitudinal {
        let prev = vehicle.cruise_button_prev;
        let set_released = state.button != button::SET && prev == button::SET;
        let resume_released = state.button != button::RESUME && prev == button::RESUME;
        if set_released || resume_released {
            vehicle.controls_allowed = true;
        }
        if state.button == button::CANCEL {
            vehicle.controls_allowed = false;
        }
        vehicle.cruise_button_prev = state.button;
    }
    vehicle.main_button_prev = state.main;
}

/// SCC-driven engagement, used when the stock system owns longitudinal control.
pub fn cruise_state_check(vehicle: &mut VehicleState, cruise_engaged: bool, longitudinal: bool) {
    if !longitudinal {
        vehicle.pcm_cruise_check(cruise_engaged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: u8) -> ButtonState {
        ButtonState { button, main: false }
    }

    #[test]
    fn test_engage_on_set_release() {
        let mut v = VehicleState::default();
        cruise_buttons_check(&mut v, press(button::SET), true);
        assert!(!v.controls_allowed, "engages on release, not press");
        cruise_buttons_check(&mut v, press(button::NONE), true);
        assert!(v.controls_allowed);
    }

    #[test]
    fn test_engage_on_resume_release_and_cancel_exits() {
        let mut v = VehicleState::default();
        cruise_buttons_check(&mut v, press(button::RESUME), true);
        cruise_buttons_check(&mut v, press(button::CANCEL), true);
        assert!(!v.controls_allowed, "cancel wins over the resume release");
    }

    #[test]
    fn test_buttons_ignored_without_longitudinal() {
        let mut v = VehicleState::default();
        cruise_buttons_check(&mut v, press(button::SET), false);
        cruise_buttons_check(&mut v, ButtonState { button: button::NONE, main: true }, false);
        assert!(!v.controls_allowed);
        assert_eq!(v.cruise_button_prev, button::NONE);
        assert!(v.main_button_prev);
    }

    #[test]
    fn test_state_ignored_with_longitudinal() {
        let mut v = VehicleState::default();
        cruise_state_check(&mut v, true, true);
        assert!(!v.controls_allowed);
        cruise_state_check(&mut v, true, false);
        assert!(v.controls_allowed);
    }
}
