#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_both_cubes_on_white() {
    use rand::{SeedableRng, rngs::StdRng};
    use tumblecube::{
        camera::{self, Camera, CameraUniform, Projection},
        scene::Scene,
        texture::Texture,
    };

    use crate::common::test_utils;

    // 256 wide keeps bytes_per_row at the copy alignment.
    const WIDTH: u32 = 256;
    const HEIGHT: u32 = 256;
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (device, queue) = test_utils::request_test_device(&runtime);

    // The same camera setup the windowed app makes, minus the window.
    let camera = Camera::new((0.0, 0.0, 0.0));
    let projection = Projection::new(WIDTH, HEIGHT, camera::FOVY, camera::ZNEAR, camera::ZFAR);
    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&camera, &projection);
    let buffer = camera::mk_buffer(&device, uniform);
    let layout = camera::mk_bind_group_layout(&device);
    let bind_group = camera::mk_bind_group(&device, &layout, &buffer);

    let mut rng = StdRng::seed_from_u64(42);
    let scene = Scene::new(&device, FORMAT, &layout, &mut rng);

    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let color_view = target.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_texture = Texture::create_depth_texture(&device, [WIDTH, HEIGHT], "test_depth");

    let mut encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    scene.record(&mut encoder, &color_view, &depth_texture.view, &bind_group);
    queue.submit(std::iter::once(encoder.finish()));

    let img = test_utils::read_rgba_texture(&runtime, &device, &queue, &target, WIDTH, HEIGHT);

    // Untouched objects sit at their starting translations, projecting well
    // inside the frame, so the corners must be untouched background.
    let white = image::Rgba([255u8, 255, 255, 255]);
    for (x, y) in [
        (0, 0),
        (WIDTH - 1, 0),
        (0, HEIGHT - 1),
        (WIDTH - 1, HEIGHT - 1),
    ] {
        assert_eq!(*img.get_pixel(x, y), white, "corner ({x}, {y}) not clear");
    }

    let coloured = img.pixels().filter(|pixel| **pixel != white).count();
    assert!(
        coloured > 100,
        "expected the cubes to cover pixels, found {coloured} non-white"
    );
}
