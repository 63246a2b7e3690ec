//! World-border translators: mutate the session border state, then run
//! the recompute step so the client sees the change immediately.

use std::time::Instant;

use conduit_proto::java::JavaPacket;

use crate::dispatch::JavaTranslator;
use crate::error::TranslateError;
use crate::session::Session;

pub struct SetBorderLerpSizeTranslator;

impl JavaTranslator for SetBorderLerpSizeTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::SetBorderLerpSize(lerp) = packet else {
            return Ok(());
        };
        let now = Instant::now();
        session
            .border
            .set_lerp(lerp.old_diameter, lerp.new_diameter, lerp.speed, now);
        session.push_border_update(now);
        Ok(())
    }
}

pub struct SetBorderSizeTranslator;

impl JavaTranslator for SetBorderSizeTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::SetBorderSize(size) = packet else {
            return Ok(());
        };
        session.border.set_size(size.diameter);
        session.push_border_update(Instant::now());
        Ok(())
    }
}

pub struct SetBorderCenterTranslator;

impl JavaTranslator for SetBorderCenterTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::SetBorderCenter(center) = packet else {
            return Ok(());
        };
        session.border.set_center(center.x, center.z);
        session.push_border_update(Instant::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support;
    use conduit_proto::java::{SetBorderLerpSize, SetBorderSize};

    #[test]
    fn lerp_size_sets_resizing_state() {
        let (mut session, mut rx) = test_support::active_session();
        let packet = JavaPacket::SetBorderLerpSize(SetBorderLerpSize {
            old_diameter: 100.0,
            new_diameter: 50.0,
            speed: 60_000,
        });
        SetBorderLerpSizeTranslator
            .translate(&mut session, &packet)
            .unwrap();
        assert!(session.border.resizing);
        assert_eq!(session.border.old_diameter, 100.0);
        assert_eq!(session.border.new_diameter, 50.0);
        assert_eq!(session.border.speed, 60_000);
        // The update step ran and pushed border visuals.
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn instant_size_clears_resizing() {
        let (mut session, _rx) = test_support::active_session();
        let packet = JavaPacket::SetBorderSize(SetBorderSize { diameter: 64.0 });
        SetBorderSizeTranslator
            .translate(&mut session, &packet)
            .unwrap();
        assert!(!session.border.resizing);
        assert_eq!(session.border.new_diameter, 64.0);
    }
}
