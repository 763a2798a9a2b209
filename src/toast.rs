use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use yew::prelude::*;

use texpad_core::Notice;

/// One toast at a time; a newer notice replaces the shown one and restarts
/// its timer.
#[derive(Clone)]
pub(crate) struct ToastHandle {
    current: UseStateHandle<Option<Notice>>,
    timer: Rc<RefCell<Option<Timeout>>>,
    duration_ms: u32,
}

impl ToastHandle {
    pub(crate) fn show(&self, notice: Notice) {
        if notice.is_failure() {
            gloo::console::warn!("notice", notice.message());
        }
        self.current.set(Some(notice));
        let current = self.current.clone();
        let timeout = Timeout::new(self.duration_ms, move || current.set(None));
        self.timer.borrow_mut().replace(timeout);
    }
}

impl PartialEq for ToastHandle {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current && Rc::ptr_eq(&self.timer, &other.timer)
    }
}

#[hook]
pub(crate) fn use_toast(duration_ms: u32) -> ToastHandle {
    let current = use_state(|| None::<Notice>);
    let timer = use_mut_ref(|| None::<Timeout>);
    ToastHandle {
        current,
        timer,
        duration_ms,
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ToastProps {
    pub handle: ToastHandle,
}

#[function_component(Toast)]
pub(crate) fn toast(props: &ToastProps) -> Html {
    let notice = *props.handle.current;
    let class = classes!(
        notice.map(|_| "show"),
        notice.filter(|notice| notice.is_failure()).map(|_| "error"),
    );
    html! {
        <div id="toast" {class} role="status">
            { notice.map(Notice::message).unwrap_or_default() }
        </div>
    }
}
