mod dispatch;
mod fallback;
mod notifier;
mod registry;
