mod alert;
mod attempt;
mod event;
mod ticket;
