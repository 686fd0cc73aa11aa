// 界面控制器 - 管理三个互斥主界面、设置浮层和提示消息
//
// 只维护状态并通过事件总线通知渲染端，不涉及任何具体的绘制方式

use std::path::PathBuf;
use std::sync::Arc;

use crate::event_bus::{AppEvent, EventBus};
use crate::models::{AnnotatedLine, Modal, SaveStatus, UiSnapshot, View};

/// 提示消息自动隐藏时间（毫秒）
pub const TOAST_DURATION_MS: u64 = 3000;

/// 保存成功后自动关闭设置浮层的延迟（毫秒）
pub const SETTINGS_CLOSE_DELAY_MS: u64 = 1000;

pub struct ViewController {
    events: Arc<EventBus>,
    state: UiSnapshot,
    /// 每次显示提示消息递增，用于判断隐藏定时器是否过期
    toast_generation: u64,
}

impl ViewController {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            events,
            state: UiSnapshot::default(),
            toast_generation: 0,
        }
    }

    /// 切换主界面，其余两个全部隐藏
    pub fn show_view(&mut self, view: View) {
        self.state.view = view;
        self.events.publish(AppEvent::ViewChanged { view });
    }

    pub fn toggle_modal(&mut self, modal: Modal, visible: bool) {
        match modal {
            Modal::Settings => self.state.settings_open = visible,
        }
        self.events.publish(AppEvent::ModalToggled { modal, visible });
    }

    /// 显示提示消息，返回本次消息的代号
    ///
    /// 调用方在 [`TOAST_DURATION_MS`] 之后以该代号调用 [`Self::hide_toast`]；
    /// 新消息会让旧的隐藏请求失效
    pub fn show_toast(&mut self, message: impl Into<String>) -> u64 {
        let message = message.into();
        self.toast_generation += 1;
        self.state.toast = Some(message.clone());
        self.events.publish(AppEvent::ToastShown {
            message,
            generation: self.toast_generation,
        });
        self.toast_generation
    }

    /// 隐藏提示消息；代号已过期时不做任何事并返回 false
    pub fn hide_toast(&mut self, generation: u64) -> bool {
        if generation != self.toast_generation || self.state.toast.is_none() {
            return false;
        }
        self.state.toast = None;
        self.events.publish(AppEvent::ToastHidden { generation });
        true
    }

    /// 切换 API Key 输入框的掩码/明文显示，返回切换后是否为掩码
    pub fn toggle_api_key_visibility(&mut self) -> bool {
        self.state.api_key_masked = !self.state.api_key_masked;
        let masked = self.state.api_key_masked;
        self.events.publish(AppEvent::ApiKeyVisibilityChanged { masked });
        masked
    }

    pub fn set_api_key_input(&mut self, value: impl Into<String>) {
        self.state.api_key_input = value.into();
    }

    pub fn set_save_status(&mut self, status: SaveStatus) {
        self.state.save_status = Some(status.clone());
        self.events.publish(AppEvent::SaveStatusChanged { status });
    }

    pub fn set_camera_selection(&mut self, selection: Option<PathBuf>) {
        self.state.camera_selection = selection;
    }

    /// 替换结果容器中的全部卡片
    pub fn render_cards(&mut self, cards: Vec<AnnotatedLine>) {
        self.state.cards.clear();
        self.state.cards.extend(cards);
        self.events.publish(AppEvent::CardsRendered {
            cards: self.state.cards.clone(),
        });
    }

    pub fn clear_cards(&mut self) {
        self.state.cards.clear();
    }

    pub fn snapshot(&self) -> UiSnapshot {
        self.state.clone()
    }
}
