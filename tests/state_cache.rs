extern crate crayon_gles;
extern crate env_logger;

use crayon_gles::prelude::*;

fn setup(max_texture_units: u32) -> (StateCache, Probe) {
    let _ = env_logger::try_init();

    let device = HeadlessDevice::new(max_texture_units);
    let probe = device.probe();
    let state = StateCache::new(Box::new(device), Settings::default()).unwrap();
    (state, probe)
}

#[test]
fn clear_color() {
    let (mut state, probe) = setup(8);

    state.set_clear_color([1.0f32, 0.0, 0.0, 1.0]).unwrap();
    state.set_clear_color(Color::new(1.0, 0.0, 0.0, 1.0)).unwrap();
    assert_eq!(probe.calls(), vec![Call::ClearColor(Color::new(1.0, 0.0, 0.0, 1.0))]);

    // Out of range channels are clipped before comparing.
    state.set_clear_color([2.0f32, -1.0, 0.0, 1.0]).unwrap();
    assert_eq!(probe.count(|v| matches!(v, Call::ClearColor(_))), 1);

    state.set_clear_color(Color::black()).unwrap();
    assert_eq!(probe.count(|v| matches!(v, Call::ClearColor(_))), 2);
    assert_eq!(state.mirror().clear_color, Some(Color::black()));
}

#[test]
fn viewport() {
    let (mut state, probe) = setup(8);

    state.set_viewport(Viewport::new(0, 0, 100, 100)).unwrap();
    state.set_viewport(Viewport::new(0, 0, 100, 100)).unwrap();
    state.set_viewport(Viewport::new(0, 0, 200, 100)).unwrap();

    assert_eq!(
        probe.calls(),
        vec![
            Call::Viewport(Viewport::new(0, 0, 100, 100)),
            Call::Viewport(Viewport::new(0, 0, 200, 100)),
        ]
    );
}

#[test]
fn invalidate() {
    let (mut state, probe) = setup(8);

    state.set_viewport(Viewport::new(0, 0, 64, 64)).unwrap();
    assert_eq!(state.max_texture_units().unwrap(), 8);

    state.invalidate();
    assert_eq!(state.mirror().viewport, None);

    state.set_viewport(Viewport::new(0, 0, 64, 64)).unwrap();
    assert_eq!(state.max_texture_units().unwrap(), 8);

    assert_eq!(probe.count(|v| matches!(v, Call::Viewport(_))), 2);
    assert_eq!(probe.count(|v| *v == Call::MaxTextureUnits), 1);
}

#[test]
fn cached_buffer_binding() {
    let (mut state, probe) = setup(8);

    state.bind_buffer(BufferTarget::Framebuffer, 3, Caching::Cached).unwrap();
    state.bind_buffer(BufferTarget::Framebuffer, 3, Caching::Cached).unwrap();
    state.bind_buffer(BufferTarget::DrawFramebuffer, 3, Caching::Cached).unwrap();
    state.bind_buffer(BufferTarget::ReadFramebuffer, 3, Caching::Cached).unwrap();
    assert_eq!(probe.calls(), vec![Call::BindBuffer(BufferTarget::Framebuffer, 3)]);

    state.bind_buffer(BufferTarget::ReadFramebuffer, 4, Caching::Cached).unwrap();
    assert_eq!(state.mirror().buffer(BufferTarget::Framebuffer), None);
    assert_eq!(state.mirror().buffer(BufferTarget::DrawFramebuffer), Some(3));

    // Draw and read slots disagree, so the combined target must be bound again.
    state.bind_buffer(BufferTarget::Framebuffer, 3, Caching::Cached).unwrap();
    assert_eq!(probe.count(|v| matches!(v, Call::BindBuffer(..))), 3);

    state.bind_buffer(BufferTarget::Renderbuffer, 3, Caching::Cached).unwrap();
    state.bind_buffer(BufferTarget::Renderbuffer, 3, Caching::Cached).unwrap();
    assert_eq!(probe.count(|v| matches!(v, Call::BindBuffer(BufferTarget::Renderbuffer, _))), 1);
}

#[test]
fn uncached_buffer_binding() {
    let (mut state, probe) = setup(8);

    state.bind_buffer(BufferTarget::Framebuffer, 3, Caching::Cached).unwrap();
    state.bind_buffer(BufferTarget::Framebuffer, 3, Caching::Uncached).unwrap();
    state.bind_buffer(BufferTarget::Framebuffer, 5, Caching::Uncached).unwrap();
    assert_eq!(probe.count(|v| matches!(v, Call::BindBuffer(..))), 3);

    // The mirror still believes 3 is bound.
    assert_eq!(state.mirror().buffer(BufferTarget::Framebuffer), Some(3));
    state.bind_buffer(BufferTarget::Framebuffer, 5, Caching::Cached).unwrap();
    assert_eq!(probe.count(|v| matches!(v, Call::BindBuffer(..))), 4);
}

#[test]
fn current_buffers() {
    let _ = env_logger::try_init();

    let device = HeadlessDevice::with_default_buffers(8, 7, 9);
    let probe = device.probe();
    let mut state = StateCache::new(Box::new(device), Settings::default()).unwrap();

    assert_eq!(state.current_framebuffer().unwrap(), 7);
    assert_eq!(state.current_framebuffer().unwrap(), 7);
    assert_eq!(state.current_renderbuffer().unwrap(), 9);
    assert_eq!(state.current_renderbuffer().unwrap(), 9);
    assert_eq!(probe.count(|v| matches!(v, Call::BufferBinding(_))), 2);

    state.bind_buffer(BufferTarget::Framebuffer, 2, Caching::Cached).unwrap();
    assert_eq!(state.current_framebuffer().unwrap(), 2);
    assert_eq!(probe.count(|v| matches!(v, Call::BufferBinding(_))), 2);

    // Bindings which bypass the cache are only seen after an invalidation.
    probe.bind_buffer_out_of_band(BufferTarget::Framebuffer, 11);
    assert_eq!(state.current_framebuffer().unwrap(), 2);
    state.invalidate();
    assert_eq!(state.current_framebuffer().unwrap(), 11);
    assert_eq!(probe.count(|v| matches!(v, Call::BufferBinding(_))), 3);
}

#[test]
fn features() {
    let (mut state, probe) = setup(8);

    state.set_feature(Feature::DepthTest, true).unwrap();
    state.set_feature(Feature::DepthTest, true).unwrap();
    state.set_feature(Feature::ScissorTest, false).unwrap();
    state.set_feature(Feature::ScissorTest, false).unwrap();
    state.set_feature(Feature::DepthTest, false).unwrap();

    assert_eq!(
        probe.calls(),
        vec![
            Call::Enable(Feature::DepthTest),
            Call::Disable(Feature::ScissorTest),
            Call::Disable(Feature::DepthTest),
        ]
    );

    assert_eq!(state.mirror().feature(Feature::DepthTest), Some(false));
    assert_eq!(state.mirror().feature(Feature::StencilTest), None);
}

#[test]
fn front_cull_face() {
    let (mut state, probe) = setup(8);

    let ccw = Some(FrontFace::CounterClockwise);
    state.set_front_cull_face(ccw, Some(CullFace::Back)).unwrap();
    state.set_front_cull_face(ccw, Some(CullFace::Back)).unwrap();
    assert_eq!(
        probe.calls(),
        vec![
            Call::FrontFace(FrontFace::CounterClockwise),
            Call::CullFace(CullFace::Back),
            Call::Enable(Feature::CullFace),
        ]
    );

    probe.clear();
    state.set_front_cull_face(ccw, Some(CullFace::Front)).unwrap();
    assert_eq!(probe.calls(), vec![Call::CullFace(CullFace::Front)]);

    probe.clear();
    state.set_front_cull_face(None, Some(CullFace::Front)).unwrap();
    state.set_front_cull_face(ccw, None).unwrap();
    assert_eq!(probe.calls(), vec![Call::Disable(Feature::CullFace)]);
    assert_eq!(state.mirror().front_face, None);
    assert_eq!(state.mirror().cull_face, None);

    probe.clear();
    state.set_front_cull_face(ccw, Some(CullFace::Front)).unwrap();
    assert_eq!(
        probe.calls(),
        vec![
            Call::FrontFace(FrontFace::CounterClockwise),
            Call::CullFace(CullFace::Front),
            Call::Enable(Feature::CullFace),
        ]
    );
}

#[test]
fn blend_alpha() {
    let (mut state, probe) = setup(8);

    state.set_blend_alpha(true).unwrap();
    state.set_blend_alpha(true).unwrap();
    assert_eq!(
        probe.calls(),
        vec![
            Call::Enable(Feature::Blend),
            Call::BlendFunc(BlendFactor::SourceAlpha, BlendFactor::OneMinusSourceAlpha),
        ]
    );

    state.set_blend_alpha(false).unwrap();
    state.set_blend_alpha(false).unwrap();
    assert_eq!(probe.count(|v| *v == Call::Disable(Feature::Blend)), 1);

    state.set_blend_alpha(true).unwrap();
    assert_eq!(probe.count(|v| matches!(v, Call::BlendFunc(..))), 2);
    assert_eq!(state.mirror().feature(Feature::Blend), Some(true));
}

#[test]
fn defaults() {
    let _ = env_logger::try_init();

    let device = HeadlessDevice::new(8);
    let probe = device.probe();
    let settings = Settings::from_json(r#"{ "mipmap_hint": "Nicest", "unpack_alignment": 4 }"#)
        .unwrap();
    let mut state = StateCache::new(Box::new(device), settings).unwrap();

    state.set_defaults().unwrap();
    state.set_defaults().unwrap();

    let expected = vec![
        Call::HintMipmap(Hint::Nicest),
        Call::PixelStore(PixelStore::UnpackAlignment, 4),
        Call::PixelStore(PixelStore::PackAlignment, 4),
    ];

    assert_eq!(probe.calls()[..3], expected[..]);
    assert_eq!(probe.calls()[3..], expected[..]);
    assert_eq!(state.mirror().mipmap_hint, Some(Hint::Nicest));
    assert_eq!(state.mirror().unpack_alignment, Some(4));
}

#[test]
fn invalid_settings() {
    let mut settings = Settings::default();
    settings.pack_alignment = 3;

    match StateCache::new(Box::new(HeadlessDevice::new(8)), settings) {
        Err(Error::Settings(_)) => {}
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("settings should be rejected"),
    }
}

#[test]
fn context_not_current() {
    let (mut state, probe) = setup(8);
    probe.set_current(false);

    match state.set_viewport(Viewport::new(0, 0, 1, 1)) {
        Err(Error::ContextNotCurrent) => {}
        other => panic!("unexpected {:?}", other.err()),
    }

    assert!(state.set_feature(Feature::Blend, true).unwrap_err().is_fatal());
    assert!(state.current_framebuffer().is_err());
    assert!(state.max_texture_units().is_err());
    assert!(probe.calls().is_empty());

    // Nothing has been recorded, so the first request after recovering reaches the device.
    probe.set_current(true);
    state.set_viewport(Viewport::new(0, 0, 1, 1)).unwrap();
    assert_eq!(probe.calls().len(), 1);
}
