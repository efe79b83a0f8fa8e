mod color;
