#![forbid(unsafe_code)]

//! Host commands emitted by the picker.
//!
//! Every visible or browser-level effect of the controller is expressed as a
//! [`HostCommand`]. The host applies them in order after each dispatch:
//! marks become CSS classes, [`HostCommand::Listen`] becomes
//! `addEventListener` calls, and so on. Nothing in this crate touches a DOM.

use bitflags::bitflags;

use crate::element::ElementId;

/// Visual marker applied to an element (rendered by the host as a CSS class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Token is the payload of an in-flight drag.
    Dragging,
    /// Token is the current tap selection.
    Selected,
    /// Zone is a drop candidate under an in-flight drag.
    DragOver,
    /// Zone just rejected a placement; always transient.
    Wrong,
    /// Document root marker for touch-primary sessions.
    TouchDevice,
}

impl Mark {
    /// CSS class name the host should toggle.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Dragging => "dragging",
            Self::Selected => "selected",
            Self::DragOver => "drag-over",
            Self::Wrong => "wrong",
            Self::TouchDevice => "touch-device",
        }
    }
}

bitflags! {
    /// Set of event listeners the host must attach to one element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HandlerSet: u8 {
        const DRAG_START = 0b0000_0001;
        const DRAG_END   = 0b0000_0010;
        const DRAG_ENTER = 0b0000_0100;
        const DRAG_OVER  = 0b0000_1000;
        const DRAG_LEAVE = 0b0001_0000;
        const DROP       = 0b0010_0000;
        const TAP        = 0b0100_0000;

        /// Listeners of a draggable token.
        const DRAG_SOURCE = Self::DRAG_START.bits() | Self::DRAG_END.bits();
        /// Listeners of a drop zone in pointer mode.
        const DROP_TARGET = Self::DRAG_ENTER.bits()
            | Self::DRAG_OVER.bits()
            | Self::DRAG_LEAVE.bits()
            | Self::DROP.bits();
    }
}

impl HandlerSet {
    /// True when the set contains any drag-family listener.
    #[must_use]
    pub const fn has_drag(self) -> bool {
        self.intersects(Self::DRAG_SOURCE.union(Self::DROP_TARGET))
    }

    /// True when the set contains the tap listener.
    #[must_use]
    pub const fn has_tap(self) -> bool {
        self.contains(Self::TAP)
    }
}

/// `dataTransfer.effectAllowed` value set on drag start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DropEffect {
    #[default]
    Move,
    Copy,
    Link,
}

impl DropEffect {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Link => "link",
        }
    }
}

/// One instruction for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    AddMark { element: ElementId, mark: Mark },
    RemoveMark { element: ElementId, mark: Mark },
    /// Add a marker class to the document root.
    MarkRoot { mark: Mark },
    /// Attach the listed listeners to `element`.
    Listen {
        element: ElementId,
        handlers: HandlerSet,
    },
    /// Store `data` as `text/plain` drag data for the current drag.
    SetDragData {
        element: ElementId,
        data: String,
        effect: DropEffect,
    },
    /// Suppress the default browser action of the current event.
    PreventDefault,
    /// Stop the current event from bubbling to document listeners.
    StopPropagation,
    ShowHint { text: String },
    HideHint,
}

/// Ordered buffer of commands produced while handling one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    commands: Vec<HostCommand>,
}

impl CommandQueue {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: HostCommand) {
        self.commands.push(command);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[HostCommand] {
        &self.commands
    }

    /// Take all buffered commands, leaving the queue empty.
    pub fn take(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Shorthand for the event-interception pair used by tap handlers.
    pub fn intercept(&mut self) {
        self.commands.push(HostCommand::PreventDefault);
        self.commands.push(HostCommand::StopPropagation);
    }
}

impl Extend<HostCommand> for CommandQueue {
    fn extend<T: IntoIterator<Item = HostCommand>>(&mut self, iter: T) {
        self.commands.extend(iter);
    }
}
