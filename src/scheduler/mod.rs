pub mod update_queues;
