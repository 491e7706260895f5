use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::events::{EventHandler, EventProducer, Handler, OrderCreatedEvent, OrderUpdatedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_created_producer: Vec<EventProducer<OrderCreatedEvent>>,
    pub order_updated_producer: Vec<EventProducer<OrderUpdatedEvent>>,
}

pub struct EventHandlers {
    pub on_order_created: Option<EventHandler<OrderCreatedEvent>>,
    pub on_order_updated: Option<EventHandler<OrderUpdatedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_created = hooks.on_order_created.map(|f| EventHandler::new(buffer_size, f));
        let on_order_updated = hooks.on_order_updated.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_created, on_order_updated }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_created {
            result.order_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_updated {
            result.order_updated_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns a task for every registered handler. Each task ends once all of its producers have been dropped.
    pub fn start_handlers(self) {
        if let Some(handler) = self.on_order_created {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_order_updated {
            tokio::spawn(handler.start_handler());
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_created: Option<Handler<OrderCreatedEvent>>,
    pub on_order_updated: Option<Handler<OrderUpdatedEvent>>,
}

impl EventHooks {
    pub fn on_order_created<F>(&mut self, f: F) -> &mut Self
    where F: Fn(OrderCreatedEvent) -> BoxFuture<'static, ()> + Send + Sync + 'static {
        self.on_order_created = Some(Arc::new(f));
        self
    }

    pub fn on_order_updated<F>(&mut self, f: F) -> &mut Self
    where F: Fn(OrderUpdatedEvent) -> BoxFuture<'static, ()> + Send + Sync + 'static {
        self.on_order_updated = Some(Arc::new(f));
        self
    }
}
