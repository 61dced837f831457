use super::{dispatch, record_command_buffer, App, AppEvent, InputState, Swapchain, VulkanContext};
use crate::{fonts, settings::WindowSettings, ShowcaseError, ShowcaseResult};
use ash::vk;
use imgui::{Context, DrawData};
use imgui_rs_vulkan_renderer::{Options, Renderer};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy},
    window::{Window, WindowBuilder},
};
#[cfg(feature = "gpu-allocator")]
use {
    gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc},
    std::sync::{Arc, Mutex},
};

/// Window, Vulkan and imgui, ready to run an [`App`].
pub struct System {
    // Dropped first: the surface must go before the window
    gpu: Gpu,
    window: Window,
    event_loop: EventLoop<String>,
    imgui: Context,
    platform: WinitPlatform,
}

impl System {
    pub fn new(settings: &WindowSettings) -> ShowcaseResult<Self> {
        log::info!("Create application");
        let (window, event_loop) = create_window(settings)?;

        let vulkan_context = VulkanContext::new(&window, &settings.title)?;
        let size = window.inner_size();
        let mut swapchain = Swapchain::new(&vulkan_context, [size.width, size.height])?;
        let sync = match FrameSync::new(&vulkan_context) {
            Ok(sync) => sync,
            Err(error) => {
                swapchain.destroy(&vulkan_context);
                return Err(error);
            }
        };
        let gpu = Gpu {
            swapchain,
            sync,
            vulkan_context,
            dirty_swapchain: false,
        };

        let mut imgui = Context::create();
        imgui.set_ini_filename(None);

        let mut platform = WinitPlatform::init(&mut imgui);
        platform.attach_window(imgui.io_mut(), &window, HiDpiMode::Rounded);
        let hidpi_factor = platform.hidpi_factor();
        // Fonts are rasterized at the physical size and scaled back down.
        imgui.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;

        Ok(Self {
            gpu,
            window,
            event_loop,
            imgui,
            platform,
        })
    }

    /// Sends messages to [`App::got_message`] from anywhere, including other threads.
    pub fn message_proxy(&self) -> EventLoopProxy<String> {
        self.event_loop.create_proxy()
    }

    pub fn hidpi_factor(&self) -> f64 {
        self.platform.hidpi_factor()
    }

    /// Runs `app` until the window closes.
    ///
    /// GPU objects are released on every exit path, including a failed [`App::setup`].
    pub fn run<A: App>(mut self, mut app: A) -> ShowcaseResult<()> {
        log::info!("Setting up application");
        app.setup(&mut self.imgui, self.platform.hidpi_factor())?;
        let [width, height] = fonts::build_atlas(&mut self.imgui);
        log::debug!("Uploading {}x{} font atlas", width, height);

        let result = match create_renderer(&self.gpu, &mut self.imgui) {
            Ok(mut renderer) => {
                log::info!("Starting application");
                let result = run_event_loop(
                    self.event_loop,
                    &self.window,
                    &mut self.imgui,
                    &mut self.platform,
                    &mut self.gpu,
                    &mut renderer,
                    &mut app,
                );
                // The renderer goes before the device
                self.gpu.wait_idle();
                result
            }
            Err(error) => Err(error),
        };

        app.destroy(&self.gpu.vulkan_context);
        result
    }
}

fn run_event_loop<A: App>(
    event_loop: EventLoop<String>,
    window: &Window,
    imgui: &mut Context,
    platform: &mut WinitPlatform,
    gpu: &mut Gpu,
    renderer: &mut Renderer,
    app: &mut A,
) -> ShowcaseResult<()> {
    let mut input = InputState::default();
    let mut last_frame = Instant::now();
    let mut failure = None;

    event_loop.run(|event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        platform.handle_event(imgui.io_mut(), window, &event);

        match event {
            Event::NewEvents(_) => {
                let now = Instant::now();
                let delta = now - last_frame;
                imgui.io_mut().update_delta_time(delta);
                last_frame = now;
                app.update(delta);
            }
            Event::AboutToWait => window.request_redraw(),
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                let mut frame = || -> ShowcaseResult<()> {
                    let PhysicalSize { width, height } = window.inner_size();
                    // Nothing to draw to while minimized
                    if !gpu.prepare(renderer, [width, height])? {
                        return Ok(());
                    }

                    platform
                        .prepare_frame(imgui.io_mut(), window)
                        .map_err(|e| ShowcaseError::Init(format!("Failed to prepare frame: {e}")))?;
                    let ui = imgui.new_frame();
                    app.draw(ui);
                    platform.prepare_render(ui, window);
                    let draw_data = imgui.render();

                    gpu.draw(renderer, draw_data)
                };
                if let Err(error) = frame() {
                    log::error!("Failed to render frame: {}", error);
                    failure = Some(error);
                    elwt.exit();
                }
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::WindowEvent { event, .. } => {
                if let WindowEvent::Resized(new_size) = &event {
                    log::debug!("Window was resized. New size is {:?}", new_size);
                    gpu.dirty_swapchain = true;
                }
                if let Some(event) = input.translate(&event) {
                    dispatch(&mut *app, &event);
                }
            }
            Event::UserEvent(message) => dispatch(&mut *app, &AppEvent::Message(message)),
            Event::LoopExiting => log::info!("Stopping application"),
            _ => (),
        }
    })?;

    match failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn create_window(settings: &WindowSettings) -> ShowcaseResult<(Window, EventLoop<String>)> {
    log::debug!("Creating window and event loop");
    #[cfg_attr(not(all(test, target_os = "linux")), allow(unused_mut))]
    let mut builder = EventLoopBuilder::<String>::with_user_event();
    // The test harness runs tests off the main thread
    #[cfg(all(test, target_os = "linux"))]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(true);
    }
    let event_loop = builder.build()?;
    let window = WindowBuilder::new()
        .with_title(&settings.title)
        .with_inner_size(PhysicalSize::new(settings.width, settings.height))
        .with_resizable(true)
        .build(&event_loop)?;

    Ok((window, event_loop))
}

fn create_renderer(gpu: &Gpu, imgui: &mut Context) -> ShowcaseResult<Renderer> {
    let vulkan_context = &gpu.vulkan_context;
    let swapchain = &gpu.swapchain;
    let options = Some(Options {
        in_flight_frames: 1,
        ..Default::default()
    });

    #[cfg(feature = "gpu-allocator")]
    let renderer = {
        let allocator = Allocator::new(&AllocatorCreateDesc {
            instance: vulkan_context.instance.clone(),
            device: vulkan_context.device.clone(),
            physical_device: vulkan_context.physical_device,
            debug_settings: Default::default(),
            buffer_device_address: false,
            allocation_sizes: Default::default(),
        })?;

        Renderer::with_gpu_allocator(
            Arc::new(Mutex::new(allocator)),
            vulkan_context.device.clone(),
            vulkan_context.graphics_queue,
            vulkan_context.command_pool,
            swapchain.render_pass,
            imgui,
            options,
        )?
    };

    #[cfg(not(feature = "gpu-allocator"))]
    let renderer = Renderer::with_default_allocator(
        &vulkan_context.instance,
        vulkan_context.physical_device,
        vulkan_context.device.clone(),
        vulkan_context.graphics_queue,
        vulkan_context.command_pool,
        swapchain.render_pass,
        imgui,
        options,
    )?;

    Ok(renderer)
}

/// Command buffer and synchronization objects of the single frame in flight.
struct FrameSync {
    command_buffer: vk::CommandBuffer,
    image_available_semaphore: vk::Semaphore,
    render_finished_semaphore: vk::Semaphore,
    fence: vk::Fence,
}

impl FrameSync {
    fn new(vulkan_context: &VulkanContext) -> ShowcaseResult<Self> {
        let mut sync = Self {
            command_buffer: vk::CommandBuffer::null(),
            image_available_semaphore: vk::Semaphore::null(),
            render_finished_semaphore: vk::Semaphore::null(),
            fence: vk::Fence::null(),
        };

        // Null handles left by a partial failure are ignored by destroy
        if let Err(error) = sync.create(vulkan_context) {
            sync.destroy(vulkan_context);
            return Err(error);
        }

        Ok(sync)
    }

    fn create(&mut self, vulkan_context: &VulkanContext) -> ShowcaseResult<()> {
        let device = &vulkan_context.device;

        self.command_buffer = {
            let allocate_info = vk::CommandBufferAllocateInfo::builder()
                .command_pool(vulkan_context.command_pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            unsafe { device.allocate_command_buffers(&allocate_info)?[0] }
        };

        // Semaphores used for presentation
        let semaphore_info = vk::SemaphoreCreateInfo::builder();
        self.image_available_semaphore = unsafe { device.create_semaphore(&semaphore_info, None)? };
        self.render_finished_semaphore = unsafe { device.create_semaphore(&semaphore_info, None)? };

        self.fence = {
            let fence_info = vk::FenceCreateInfo::builder().flags(vk::FenceCreateFlags::SIGNALED);
            unsafe { device.create_fence(&fence_info, None)? }
        };

        Ok(())
    }

    fn destroy(&mut self, vulkan_context: &VulkanContext) {
        let device = &vulkan_context.device;
        unsafe {
            device.destroy_fence(self.fence, None);
            device.destroy_semaphore(self.image_available_semaphore, None);
            device.destroy_semaphore(self.render_finished_semaphore, None);
            if self.command_buffer != vk::CommandBuffer::null() {
                device.free_command_buffers(vulkan_context.command_pool, &[self.command_buffer]);
            }
        }
        self.fence = vk::Fence::null();
        self.image_available_semaphore = vk::Semaphore::null();
        self.render_finished_semaphore = vk::Semaphore::null();
        self.command_buffer = vk::CommandBuffer::null();
    }
}

/// Swapchain and frame objects, released with the device when dropped.
///
/// The renderer is kept outside so it can be dropped first.
struct Gpu {
    swapchain: Swapchain,
    sync: FrameSync,
    vulkan_context: VulkanContext,
    dirty_swapchain: bool,
}

impl Gpu {
    /// Recreates the swapchain if needed. Returns false when the window has no area.
    fn prepare(&mut self, renderer: &mut Renderer, [width, height]: [u32; 2]) -> ShowcaseResult<bool> {
        if !self.dirty_swapchain {
            return Ok(true);
        }
        if width == 0 || height == 0 {
            return Ok(false);
        }

        self.swapchain
            .recreate(&self.vulkan_context, [width, height])?;
        renderer.set_render_pass(self.swapchain.render_pass)?;
        self.dirty_swapchain = false;
        Ok(true)
    }

    fn draw(&mut self, renderer: &mut Renderer, draw_data: &DrawData) -> ShowcaseResult<()> {
        let device = &self.vulkan_context.device;
        let FrameSync {
            command_buffer,
            image_available_semaphore,
            render_finished_semaphore,
            fence,
        } = self.sync;

        unsafe { device.wait_for_fences(&[fence], true, u64::MAX)? };

        let next_image_result = unsafe {
            self.swapchain.loader.acquire_next_image(
                self.swapchain.khr,
                u64::MAX,
                image_available_semaphore,
                vk::Fence::null(),
            )
        };
        let image_index = match next_image_result {
            Ok((image_index, _)) => image_index,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                self.dirty_swapchain = true;
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };

        unsafe { device.reset_fences(&[fence])? };

        record_command_buffer(
            device,
            self.vulkan_context.command_pool,
            command_buffer,
            self.swapchain.framebuffers[image_index as usize],
            self.swapchain.render_pass,
            self.swapchain.extent,
            renderer,
            draw_data,
        )?;

        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let wait_semaphores = [image_available_semaphore];
        let signal_semaphores = [render_finished_semaphore];
        let command_buffers = [command_buffer];
        let submit_info = [vk::SubmitInfo::builder()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores)
            .build()];
        unsafe { device.queue_submit(self.vulkan_context.graphics_queue, &submit_info, fence)? };

        let swapchains = [self.swapchain.khr];
        let images_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&images_indices);

        let present_result = unsafe {
            self.swapchain
                .loader
                .queue_present(self.vulkan_context.present_queue(), &present_info)
        };
        match present_result {
            Ok(true) | Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => self.dirty_swapchain = true,
            Ok(false) => {}
            Err(error) => return Err(error.into()),
        }

        Ok(())
    }

    fn wait_idle(&self) {
        if let Err(error) = unsafe { self.vulkan_context.device.device_wait_idle() } {
            log::error!("Failed to wait for the device to be idle: {}", error);
        }
    }
}

impl Drop for Gpu {
    fn drop(&mut self) {
        log::debug!("Destroying swapchain and frame objects");
        self.wait_idle();
        self.sync.destroy(&self.vulkan_context);
        self.swapchain.destroy(&self.vulkan_context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{settings::Settings, FontShowcase};

    #[test]
    #[ignore = "needs a display and a Vulkan device"]
    fn failed_setup_releases_the_gpu() {
        let settings = Settings::default();
        let system = System::new(&settings.window).unwrap();
        system
            .message_proxy()
            .send_event("hello".to_owned())
            .unwrap();
        let app = FontShowcase::new("no/such/dir", settings.fonts.clone());

        // Swapchain and frame objects are destroyed before the device on the way out
        assert!(matches!(
            system.run(app),
            Err(ShowcaseError::FontNotFound { .. })
        ));
    }
}
