// App Actor - 拍摄→识别→注音→展示的状态机
//
// 界面事件被转换成 AppCommand，由 Actor 逐条处理并更新界面状态
// 每一轮识别在独立任务中执行，新的拍摄会中止尚未完成的上一轮

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::annotation::{self, PhoneticConverter};
use crate::capture::{self, CameraInput};
use crate::error::CaptureError;
use crate::event_bus::AppEvent;
use crate::models::{messages, Modal, SaveStatus, UiSnapshot, View};
use crate::ocr::OcrProvider;
use crate::view::{ViewController, SETTINGS_CLOSE_DELAY_MS, TOAST_DURATION_MS};
use crate::AppState;

/// 界面命令
pub enum AppCommand {
    /// 打开设置浮层
    OpenSettings,

    /// 关闭设置浮层
    CloseSettings,

    /// 保存 API Key
    SaveSettings { api_key: String },

    /// 切换 API Key 明文/掩码显示
    ToggleApiKeyVisibility,

    /// 相机输入选中了文件（None 表示没有文件）
    ImageSelected { file: Option<PathBuf> },

    /// 关闭结果界面
    CloseResult,

    /// 提示消息到时隐藏
    HideToast { generation: u64 },

    /// 一轮识别结束
    CaptureFinished {
        cycle: u64,
        outcome: Result<Option<String>, String>,
    },

    /// 获取界面状态
    Snapshot { reply: oneshot::Sender<UiSnapshot> },
}

/// App Actor
pub struct AppActor {
    receiver: mpsc::Receiver<AppCommand>,
    /// 用于定时器和识别任务回送命令，不阻止通道关闭
    sender: mpsc::WeakSender<AppCommand>,
    state: AppState,
    view: ViewController,
    camera: CameraInput,
    /// 当前识别轮次，过期轮次的结果会被丢弃
    cycle: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl AppActor {
    /// 创建新的Actor
    pub fn new(state: AppState) -> (Self, AppHandle) {
        let (sender, receiver) = mpsc::channel(64);
        let actor = Self {
            receiver,
            sender: sender.downgrade(),
            view: ViewController::new(state.event_bus.clone()),
            state,
            camera: CameraInput::new(),
            cycle: 0,
            in_flight: None,
        };
        (actor, AppHandle { sender })
    }

    /// 运行Actor
    pub async fn run(mut self) {
        info!("App Actor 已启动");

        // 启动时把已保存的 API Key 填入输入框
        let api_key = self.state.settings.api_key().await;
        self.view.set_api_key_input(api_key);

        while let Some(cmd) = self.receiver.recv().await {
            self.handle(cmd).await;
        }

        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        info!("App Actor 已停止");
    }

    async fn handle(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::OpenSettings => self.view.toggle_modal(Modal::Settings, true),

            AppCommand::CloseSettings => self.view.toggle_modal(Modal::Settings, false),

            AppCommand::SaveSettings { api_key } => self.save_settings(api_key).await,

            AppCommand::ToggleApiKeyVisibility => {
                self.view.toggle_api_key_visibility();
            }

            AppCommand::ImageSelected { file } => self.image_selected(file).await,

            AppCommand::CloseResult => {
                self.view.clear_cards();
                self.view.show_view(View::Initial);
            }

            AppCommand::HideToast { generation } => {
                self.view.hide_toast(generation);
            }

            AppCommand::CaptureFinished { cycle, outcome } => self.capture_finished(cycle, outcome),

            AppCommand::Snapshot { reply } => {
                let _ = reply.send(self.view.snapshot());
            }
        }
    }

    async fn save_settings(&mut self, api_key: String) {
        self.view.set_api_key_input(api_key.clone());

        match self.state.settings.save_api_key(&api_key).await {
            Ok(status) => {
                let saved = status.is_success();
                self.view.set_save_status(status);
                if saved {
                    self.schedule(
                        AppCommand::CloseSettings,
                        Duration::from_millis(SETTINGS_CLOSE_DELAY_MS),
                    );
                }
            }
            Err(e) => {
                error!("保存 API Key 失败: {}", e);
                self.view.set_save_status(SaveStatus::error(e.to_string()));
            }
        }
    }

    async fn image_selected(&mut self, file: Option<PathBuf>) {
        self.camera.select(file);
        let Some(path) = self.camera.selection().map(|p| p.to_path_buf()) else {
            return;
        };
        self.view.set_camera_selection(Some(path.clone()));

        let api_key = self.state.settings.api_key().await;
        if api_key.is_empty() {
            info!("未配置 API Key，打开设置");
            self.toast(messages::API_KEY_REQUIRED);
            self.view.toggle_modal(Modal::Settings, true);
            self.reset_camera();
            return;
        }

        if let Some(previous) = self.in_flight.take() {
            previous.abort();
            info!("新的拍摄取消了第 {} 轮识别", self.cycle);
            self.state
                .event_bus
                .publish(AppEvent::CaptureCancelled { cycle: self.cycle });
        }

        self.cycle += 1;
        let cycle = self.cycle;
        self.view.show_view(View::Loading);
        self.state.event_bus.publish(AppEvent::CaptureStarted { cycle });
        info!("第 {} 轮识别开始: {:?}", cycle, path);

        let ocr = self.state.ocr.clone();
        let sender = self.sender.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = recognize(&path, ocr.as_ref(), &api_key)
                .await
                .map_err(|e| e.to_string());
            if let Some(sender) = sender.upgrade() {
                let _ = sender
                    .send(AppCommand::CaptureFinished { cycle, outcome })
                    .await;
            }
        }));
    }

    fn capture_finished(&mut self, cycle: u64, outcome: Result<Option<String>, String>) {
        if cycle != self.cycle {
            debug!("丢弃过期的第 {} 轮识别结果", cycle);
            return;
        }
        self.in_flight = None;

        match outcome {
            Ok(Some(text)) if annotation::has_visible_lines(&text) => {
                let cards = annotation::annotate(&text, self.state.converter.as_ref());
                info!("第 {} 轮识别完成: {} 行", cycle, cards.len());
                self.view.render_cards(cards);
                self.view.show_view(View::Result);
            }
            Ok(_) => {
                info!("第 {} 轮未识别到文字", cycle);
                self.toast(messages::NO_TEXT);
                self.view.show_view(View::Initial);
            }
            Err(message) => {
                warn!("第 {} 轮识别失败: {}", cycle, message);
                self.toast(format!("{}{}", messages::ERROR_PREFIX, message));
                self.view.show_view(View::Initial);
            }
        }

        self.reset_camera();
    }

    fn toast(&mut self, message: impl Into<String>) {
        let generation = self.view.show_toast(message);
        self.schedule(
            AppCommand::HideToast { generation },
            Duration::from_millis(TOAST_DURATION_MS),
        );
    }

    /// 清空相机输入，以便再次选择同一文件
    fn reset_camera(&mut self) {
        self.camera.clear();
        self.view.set_camera_selection(None);
    }

    /// 延迟发送命令给自己
    fn schedule(&self, cmd: AppCommand, delay: Duration) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(cmd).await;
            }
        });
    }
}

/// 读取图片并调用 OCR
async fn recognize(
    path: &std::path::Path,
    ocr: &dyn OcrProvider,
    api_key: &str,
) -> Result<Option<String>, CaptureError> {
    let encoded = capture::capture_to_base64(path).await?;
    Ok(ocr.recognize_text(&encoded, api_key).await?)
}

/// App Handle
#[derive(Clone)]
pub struct AppHandle {
    sender: mpsc::Sender<AppCommand>,
}

impl AppHandle {
    async fn send(&self, cmd: AppCommand) {
        if self.sender.send(cmd).await.is_err() {
            warn!("App Actor 已停止，命令被丢弃");
        }
    }

    pub async fn open_settings(&self) {
        self.send(AppCommand::OpenSettings).await;
    }

    pub async fn close_settings(&self) {
        self.send(AppCommand::CloseSettings).await;
    }

    pub async fn save_settings(&self, api_key: impl Into<String>) {
        self.send(AppCommand::SaveSettings {
            api_key: api_key.into(),
        })
        .await;
    }

    pub async fn toggle_api_key_visibility(&self) {
        self.send(AppCommand::ToggleApiKeyVisibility).await;
    }

    pub async fn select_image(&self, file: Option<PathBuf>) {
        self.send(AppCommand::ImageSelected { file }).await;
    }

    pub async fn close_result(&self) {
        self.send(AppCommand::CloseResult).await;
    }

    /// 获取界面状态
    pub async fn snapshot(&self) -> UiSnapshot {
        let (reply, rx) = oneshot::channel();
        self.sender.send(AppCommand::Snapshot { reply }).await.ok();
        rx.await.unwrap_or_default()
    }
}
