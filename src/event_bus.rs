// 事件总线 - 将界面状态变化推送给渲染端
//
// 实现发布/订阅模式，状态机与渲染端（终端、测试）互不依赖
// 使用 tokio::sync::broadcast 实现事件分发

use tokio::sync::broadcast;

use crate::models::{AnnotatedLine, Modal, SaveStatus, View};

/// 应用事件枚举 - 定义所有可能的界面事件
#[derive(Debug, Clone)]
pub enum AppEvent {
    // --- 界面事件 ---

    /// 主界面切换
    ViewChanged { view: View },

    /// 浮层显示/隐藏
    ModalToggled { modal: Modal, visible: bool },

    /// 提示消息显示
    ToastShown { message: String, generation: u64 },

    /// 提示消息隐藏
    ToastHidden { generation: u64 },

    /// 保存状态更新
    SaveStatusChanged { status: SaveStatus },

    /// API Key 输入框显示方式切换
    ApiKeyVisibilityChanged { masked: bool },

    /// 结果卡片已渲染
    CardsRendered { cards: Vec<AnnotatedLine> },

    // --- 识别事件 ---

    /// 一轮识别开始
    CaptureStarted { cycle: u64 },

    /// 一轮识别被新的拍摄取代
    CaptureCancelled { cycle: u64 },
}

/// 事件总线
///
/// 使用 broadcast channel 实现发布/订阅模式
/// 支持多个订阅者同时接收事件
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// 创建新的事件总线
    ///
    /// # 参数
    /// - `capacity`: 事件缓冲区大小
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 发布事件
    ///
    /// 如果没有订阅者,事件会被丢弃(这是正常的)
    pub fn publish(&self, event: AppEvent) {
        match self.sender.send(event) {
            Ok(receiver_count) => {
                tracing::trace!("事件已发布，订阅者数量: {}", receiver_count);
            }
            Err(_) => {
                tracing::trace!("事件已发布但无订阅者");
            }
        }
    }

    /// 订阅事件
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// 获取当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_basic() {
        let bus = EventBus::new(16);
        let mut receiver = bus.subscribe();

        bus.publish(AppEvent::ViewChanged { view: View::Loading });

        match receiver.recv().await {
            Ok(AppEvent::ViewChanged { view }) => assert_eq!(view, View::Loading),
            _ => panic!("未收到预期事件"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut receiver1 = bus.subscribe();
        let mut receiver2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(AppEvent::CaptureStarted { cycle: 1 });

        assert!(receiver1.try_recv().is_ok());
        assert!(receiver2.try_recv().is_ok());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        bus.publish(AppEvent::ToastHidden { generation: 1 });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
