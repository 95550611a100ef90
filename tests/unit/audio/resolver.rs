use super::*;
use crate::config::AudioConfig;

fn resolver(precheck: bool) -> ThemeAudioResolver {
    let base = reqwest::Url::parse("http://localhost:8000/").unwrap();
    let locator = SourceLocator::new(&base, &AudioConfig::default());
    ThemeAudioResolver::new(Theme::Light, locator, precheck, 0.5)
}

fn probe_of(effects: &[AudioEffect]) -> (SessionToken, String) {
    match effects {
        [AudioEffect::Probe { token, url }] => (*token, url.clone()),
        other => panic!("expected a single probe, got {other:?}"),
    }
}

fn play_of(effects: &[AudioEffect]) -> (SessionToken, String) {
    match effects {
        [AudioEffect::Play { token, url, volume }] => {
            assert_eq!(*volume, 0.5);
            (*token, url.clone())
        }
        other => panic!("expected a single play, got {other:?}"),
    }
}

/// Drive a fresh resolver to `Playing` on the primary source.
fn playing() -> (ThemeAudioResolver, SessionToken) {
    let mut r = resolver(true);
    let (t, _) = probe_of(&r.enable());
    let (t, _) = play_of(&r.on_probe(t, true));
    r.on_play(t, PlayOutcome::Started);
    (r, t)
}

#[test]
fn enable_probes_primary_then_plays() {
    let mut r = resolver(true);
    assert!(!r.is_enabled());
    assert_eq!(r.state(), &PlaybackState::Idle);

    let (t1, url) = probe_of(&r.enable());
    assert!(url.starts_with("http://localhost:8000/music/light?v="));
    assert!(r.is_enabled());
    assert!(matches!(
        r.state(),
        PlaybackState::Probing {
            step: ProbeStep::Checking(_),
            ..
        }
    ));

    let (t2, play_url) = play_of(&r.on_probe(t1, true));
    assert_eq!(play_url, url);
    assert_ne!(t1, t2);

    let fx = r.on_play(t2, PlayOutcome::Started);
    assert_eq!(fx, vec![AudioEffect::Notify(Notice::info(NOTE_PLAYING))]);
    assert!(matches!(r.state(), PlaybackState::Playing { source, .. } if source.kind == SourceKind::Primary));
}

#[test]
fn unreachable_primary_uses_fallback() {
    let mut r = resolver(true);
    let (t, _) = probe_of(&r.enable());
    let (t, url) = probe_of(&r.on_probe(t, false));
    assert!(url.starts_with("http://localhost:8000/static/music/light.mp3?v="));

    let (t, _) = play_of(&r.on_probe(t, true));
    assert!(r.fallback_attempted());
    r.on_play(t, PlayOutcome::Started);
    assert!(matches!(r.state(), PlaybackState::Playing { source, .. } if source.kind == SourceKind::Fallback));
}

#[test]
fn no_reachable_source_falls_to_idle() {
    let mut r = resolver(true);
    let (t, _) = probe_of(&r.enable());
    let (t, _) = probe_of(&r.on_probe(t, false));
    let fx = r.on_probe(t, false);
    assert_eq!(
        fx,
        vec![
            AudioEffect::Halt,
            AudioEffect::Notify(Notice::error(NOTE_ASSET_UNAVAILABLE))
        ]
    );
    assert_eq!(r.state(), &PlaybackState::Idle);
    assert!(!r.is_enabled());
}

#[test]
fn rejection_blocks_and_clears_enabled() {
    let mut r = resolver(true);
    let (t, _) = probe_of(&r.enable());
    let (t, _) = play_of(&r.on_probe(t, true));
    let fx = r.on_play(t, PlayOutcome::Rejected("NotAllowedError".to_string()));
    assert_eq!(
        fx,
        vec![
            AudioEffect::Halt,
            AudioEffect::Notify(Notice::error(NOTE_AUTOPLAY_BLOCKED))
        ]
    );
    assert_eq!(
        r.state(),
        &PlaybackState::Blocked {
            reason: BlockReason::AutoplayRejected
        }
    );
    assert!(!r.is_enabled());

    // A new gesture starts a fresh session.
    let (t2, _) = probe_of(&r.enable());
    assert!(t2.session > t.session);
}

#[test]
fn stale_probe_after_disable_does_not_restart_audio() {
    let (mut r, _) = playing();

    let (theme_probe, url) = probe_of(&r.set_theme(Theme::Dark));
    assert!(url.contains("/music/dark?v="));

    let fx = r.disable();
    assert_eq!(fx, vec![AudioEffect::Halt, AudioEffect::Notify(Notice::clear())]);

    assert!(r.on_probe(theme_probe, true).is_empty());
    assert_eq!(r.state(), &PlaybackState::Stopped);
    assert!(!r.is_enabled());
}

#[test]
fn stale_play_success_after_disable_is_silenced() {
    let mut r = resolver(true);
    let (t, _) = probe_of(&r.enable());
    let (t, _) = play_of(&r.on_probe(t, true));
    r.disable();
    assert_eq!(r.on_play(t, PlayOutcome::Started), vec![AudioEffect::Halt]);
    assert_eq!(r.state(), &PlaybackState::Stopped);
}

#[test]
fn theme_switch_while_playing_swaps_source_without_halting() {
    let (mut r, old) = playing();
    let fx = r.set_theme(Theme::Dark);
    assert!(!fx.contains(&AudioEffect::Halt));
    let (t, _) = probe_of(&fx);
    assert!(t.session > old.session);

    // The previous assignment's late error no longer matters.
    assert!(r.on_stream_error(old).is_empty());

    let (t, url) = play_of(&r.on_probe(t, true));
    assert!(url.contains("/music/dark?v="));
    r.on_play(t, PlayOutcome::Started);
    assert!(matches!(r.state(), PlaybackState::Playing { source, .. } if source.theme == Theme::Dark));
}

#[test]
fn latest_theme_change_wins() {
    let (mut r, _) = playing();
    let (to_dark, _) = probe_of(&r.set_theme(Theme::Dark));
    let (to_light, _) = probe_of(&r.set_theme(Theme::Light));

    assert!(r.on_probe(to_dark, true).is_empty());
    let (t, url) = play_of(&r.on_probe(to_light, true));
    assert!(url.contains("/music/light?v="));
    assert_eq!(r.current_token(), t);
}

#[test]
fn theme_switch_while_inactive_only_records_theme() {
    let mut r = resolver(true);
    assert!(r.set_theme(Theme::Dark).is_empty());
    assert_eq!(r.theme(), Theme::Dark);
    assert_eq!(r.state(), &PlaybackState::Idle);

    let (_, url) = probe_of(&r.enable());
    assert!(url.contains("/music/dark?v="));
}

#[test]
fn stream_error_substitutes_fallback_once() {
    let (mut r, t) = playing();
    let (t2, url) = play_of(&r.on_stream_error(t));
    assert!(url.contains("/static/music/light.mp3?v="));
    assert_eq!(t2.session, t.session);

    r.on_play(t2, PlayOutcome::Started);
    let fx = r.on_stream_error(t2);
    assert_eq!(
        fx,
        vec![
            AudioEffect::Halt,
            AudioEffect::Notify(Notice::error(NOTE_STREAM_FAILED))
        ]
    );
    assert_eq!(
        r.state(),
        &PlaybackState::Blocked {
            reason: BlockReason::StreamFailed
        }
    );
    assert!(!r.is_enabled());
}

#[test]
fn source_failure_at_start_counts_as_stream_error() {
    let mut r = resolver(false);
    let (t, url) = play_of(&r.enable());
    assert!(url.contains("/music/light?v="));

    let (t, url) = play_of(&r.on_play(t, PlayOutcome::SourceFailed("404".to_string())));
    assert!(url.contains("/static/music/light.mp3?v="));

    let fx = r.on_play(t, PlayOutcome::SourceFailed("404".to_string()));
    assert!(fx.contains(&AudioEffect::Notify(Notice::error(NOTE_STREAM_FAILED))));
}

#[test]
fn fallback_flag_resets_per_session() {
    let (mut r, t) = playing();
    let (t, _) = play_of(&r.on_stream_error(t));
    r.on_play(t, PlayOutcome::Started);
    assert!(r.fallback_attempted());

    let (t, _) = probe_of(&r.set_theme(Theme::Dark));
    assert!(!r.fallback_attempted());
    let (t, _) = play_of(&r.on_probe(t, true));
    r.on_play(t, PlayOutcome::Started);
    let (_, url) = play_of(&r.on_stream_error(t));
    assert!(url.contains("/static/music/dark.mp3?v="));
}

#[test]
fn enable_while_active_is_noop_and_disable_works_from_idle() {
    let mut r = resolver(true);
    let (t, _) = probe_of(&r.enable());
    assert!(r.enable().is_empty());
    assert_eq!(r.current_token(), t);

    let mut idle = resolver(true);
    idle.disable();
    assert_eq!(idle.state(), &PlaybackState::Stopped);
}
